//! Selection sets shared between operations

/// Fields of the author of a note in list views
pub(crate) const AUTHOR: &str = "author { id account realName }";

/// The selection used for a single note, by id or by path.
///
/// Attachments carry their data URLs and are only requested when
/// `include_image_data` is set, since they can be large.
pub(crate) fn note_detail(include_image_data: bool) -> String {
    let attachments = if include_image_data {
        "attachments(first: 3) { nodes { id name dataUrl mimeType } }"
    } else {
        ""
    };

    format!(
        "id
    title
    content
    contentHtml
    contentUpdatedAt
    publishedAt
    url
    path
    isLikedByCurrentUser
    {attachments}
    {AUTHOR}
    groups {{ id name }}
    folders(first: 3) {{ nodes {{ id name fullName path }} }}
    comments(first: 3) {{
      nodes {{ id content contentHtml author {{ account realName }} createdAt }}
    }}"
    )
}

/// Fields of a note in folder and group listings
pub(crate) const NOTE_SUMMARY: &str =
    "id title contentUpdatedAt publishedAt author { account realName }";
