use kibela_client::GraphQLRequest;
use kibela_client::model::{Connection, Edges, Note};
use rmcp::model::JsonObject;
use serde::Deserialize;
use serde_json::{Value, json};

use super::arguments::{Variables, decode, note_path, page_limit};
use super::fragments::{self, AUTHOR};
use super::operation::{Operation, Validation, decode_data, encode};
use crate::errors::ToolError;

pub const SEARCH_NOTES: &str = "kibela_search_notes";
pub const GET_MY_NOTES: &str = "kibela_get_my_notes";
pub const GET_NOTE_CONTENT: &str = "kibela_get_note_content";
pub const GET_RECENTLY_VIEWED_NOTES: &str = "kibela_get_recently_viewed_notes";
pub const GET_NOTE_FROM_PATH: &str = "kibela_get_note_from_path";

const SEARCH_PAGE_SIZE: u32 = 15;
const MY_NOTES_DEFAULT_LIMIT: u32 = 15;
const MY_NOTES_MAX_LIMIT: u32 = 50;
const RECENTLY_VIEWED_LIMIT: u32 = 15;

const INCLUDE_IMAGE_DATA_SCHEMA: &str = "Whether to include image data URLs in the response";

// kibela_search_notes

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchInput {
    query: String,
    coediting: Option<bool>,
    is_archived: Option<bool>,
    sort_by: Option<String>,
    user_ids: Option<Vec<String>>,
    folder_ids: Option<Vec<String>>,
}

pub(super) fn search_notes() -> Operation {
    Operation::builder()
        .name(SEARCH_NOTES)
        .description("Search Kibela notes with given query")
        .input_schema(json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "Search query" },
                "coediting": { "type": "boolean", "description": "Filter by co-editing status" },
                "isArchived": { "type": "boolean", "description": "Filter by archive status" },
                "sortBy": { "type": "string", "description": "Sort by (RELEVANT, CONTENT_UPDATED_AT)" },
                "userIds": { "type": "array", "items": { "type": "string" }, "description": "Filter by user IDs" },
                "folderIds": { "type": "array", "items": { "type": "string" }, "description": "Filter by folder IDs" }
            },
            "required": ["query"]
        }))
        .validation(Validation::Strict)
        .request(search_request)
        .reshape(search_reshape)
        .build()
}

fn search_request(arguments: &JsonObject) -> Result<GraphQLRequest, ToolError> {
    let input: SearchInput = decode(arguments)?;
    let query = format!(
        "query SearchNotes(
  $query: String!,
  $coediting: Boolean,
  $isArchived: Boolean,
  $sortBy: SearchSortKind,
  $userIds: [ID!],
  $folderIds: [ID!]
) {{
  search(
    query: $query,
    first: {SEARCH_PAGE_SIZE},
    coediting: $coediting,
    isArchived: $isArchived,
    sortBy: $sortBy,
    userIds: $userIds,
    folderIds: $folderIds
  ) {{
    edges {{
      node {{
        document {{
          __typename
          ... on Note {{ id title url contentUpdatedAt {AUTHOR} groups {{ id name }} }}
        }}
      }}
    }}
  }}
}}"
    );

    Ok(Variables::new()
        .set("query", input.query)
        .set_opt("coediting", input.coediting)
        .set_opt("isArchived", input.is_archived)
        .set_opt("sortBy", input.sort_by)
        .set_opt("userIds", input.user_ids)
        .set_opt("folderIds", input.folder_ids)
        .into_request("SearchNotes", &query))
}

#[derive(Deserialize)]
struct SearchData {
    search: Edges<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    document: Option<Value>,
}

/// Search results are a union; only the note members are kept.
fn search_document_as_note(document: Value) -> Option<Result<Note, ToolError>> {
    match document.get("__typename").and_then(Value::as_str) {
        Some("Note") => Some(decode_data(document)),
        _ => None,
    }
}

fn search_reshape(data: Value) -> Result<Value, ToolError> {
    let data: SearchData = decode_data(data)?;
    let notes = data
        .search
        .into_nodes()
        .into_iter()
        .filter_map(|result| result.document)
        .filter_map(search_document_as_note)
        .collect::<Result<Vec<Note>, _>>()?;
    encode(&notes)
}

// kibela_get_my_notes

#[derive(Debug, Deserialize)]
struct LimitInput {
    limit: Option<f64>,
}

pub(super) fn get_my_notes() -> Operation {
    Operation::builder()
        .name(GET_MY_NOTES)
        .description("Get your latest notes from Kibela")
        .input_schema(json!({
            "type": "object",
            "properties": {
                "limit": {
                    "type": "number",
                    "description": "Number of notes to fetch (max 50)",
                    "default": MY_NOTES_DEFAULT_LIMIT
                }
            }
        }))
        .request(my_notes_request)
        .reshape(my_notes_reshape)
        .build()
}

fn my_notes_request(arguments: &JsonObject) -> Result<GraphQLRequest, ToolError> {
    let input: LimitInput = decode(arguments)?;
    let query = format!(
        "query GetMyNotes($limit: Int!) {{
  currentUser {{
    latestNotes(first: $limit) {{
      totalCount
      edges {{ node {{ id title url contentUpdatedAt {AUTHOR} }} }}
    }}
  }}
}}"
    );

    Ok(Variables::new()
        .set(
            "limit",
            page_limit(input.limit, MY_NOTES_DEFAULT_LIMIT, MY_NOTES_MAX_LIMIT),
        )
        .into_request("GetMyNotes", &query))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyNotesData {
    current_user: Option<CurrentUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrentUser {
    latest_notes: Edges<Note>,
}

fn my_notes_reshape(data: Value) -> Result<Value, ToolError> {
    let data: MyNotesData = decode_data(data)?;
    let user = data
        .current_user
        .ok_or(ToolError::MissingField("current user"))?;
    encode(&user.latest_notes.into_nodes())
}

// kibela_get_note_content and kibela_get_note_from_path

#[derive(Debug, Deserialize)]
struct NoteByIdInput {
    id: String,
    #[serde(default)]
    include_image_data: Option<bool>,
}

pub(super) fn get_note_content() -> Operation {
    Operation::builder()
        .name(GET_NOTE_CONTENT)
        .description("Get content and comments of a specific note")
        .input_schema(json!({
            "type": "object",
            "properties": {
                "id": { "type": "string", "description": "Note ID" },
                "include_image_data": {
                    "type": "boolean",
                    "description": INCLUDE_IMAGE_DATA_SCHEMA,
                    "default": false
                }
            },
            "required": ["id"]
        }))
        .validation(Validation::Strict)
        .request(note_content_request)
        .reshape(note_content_reshape)
        .build()
}

fn note_content_request(arguments: &JsonObject) -> Result<GraphQLRequest, ToolError> {
    let input: NoteByIdInput = decode(arguments)?;
    let selection = fragments::note_detail(input.include_image_data.unwrap_or_default());
    let query = format!("query GetNote($id: ID!) {{\n  note(id: $id) {{\n    {selection}\n  }}\n}}");

    Ok(Variables::new()
        .set("id", input.id)
        .into_request("GetNote", &query))
}

#[derive(Deserialize)]
struct NoteData {
    note: Option<Note>,
}

fn note_content_reshape(data: Value) -> Result<Value, ToolError> {
    let data: NoteData = decode_data(data)?;
    encode(&data.note.ok_or(ToolError::MissingField("note"))?)
}

#[derive(Debug, Deserialize)]
struct NoteByPathInput {
    path: String,
    #[serde(default)]
    include_image_data: Option<bool>,
}

pub(super) fn get_note_from_path() -> Operation {
    Operation::builder()
        .name(GET_NOTE_FROM_PATH)
        .description("Get note content by its URL")
        .input_schema(json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Note path (e.g. 'https://<team>.kibe.la/notes/5154')"
                },
                "include_image_data": {
                    "type": "boolean",
                    "description": INCLUDE_IMAGE_DATA_SCHEMA,
                    "default": false
                }
            },
            "required": ["path"]
        }))
        .validation(Validation::Strict)
        .request(note_from_path_request)
        .reshape(note_from_path_reshape)
        .build()
}

fn note_from_path_request(arguments: &JsonObject) -> Result<GraphQLRequest, ToolError> {
    let input: NoteByPathInput = decode(arguments)?;
    let selection = fragments::note_detail(input.include_image_data.unwrap_or_default());
    let query = format!(
        "query GetNoteFromPath($path: String!) {{\n  noteFromPath(path: $path) {{\n    {selection}\n  }}\n}}"
    );

    Ok(Variables::new()
        .set("path", note_path(&input.path).into_owned())
        .into_request("GetNoteFromPath", &query))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteFromPathData {
    note_from_path: Option<Note>,
}

fn note_from_path_reshape(data: Value) -> Result<Value, ToolError> {
    let data: NoteFromPathData = decode_data(data)?;
    encode(&data.note_from_path.ok_or(ToolError::MissingField("note"))?)
}

// kibela_get_recently_viewed_notes

pub(super) fn get_recently_viewed_notes() -> Operation {
    Operation::builder()
        .name(GET_RECENTLY_VIEWED_NOTES)
        .description("Get your recently viewed notes")
        .input_schema(json!({
            "type": "object",
            "properties": {
                "limit": {
                    "type": "number",
                    "description": "Number of notes to fetch (max 15)",
                    "default": RECENTLY_VIEWED_LIMIT
                }
            }
        }))
        .request(recently_viewed_request)
        .reshape(recently_viewed_reshape)
        .build()
}

fn recently_viewed_request(arguments: &JsonObject) -> Result<GraphQLRequest, ToolError> {
    let input: LimitInput = decode(arguments)?;
    let query = format!(
        "query GetRecentlyViewedNotes($limit: Int!) {{
  noteBrowsingHistories(first: $limit) {{
    nodes {{ note {{ id title url contentUpdatedAt {AUTHOR} }} }}
  }}
}}"
    );

    Ok(Variables::new()
        .set(
            "limit",
            page_limit(input.limit, RECENTLY_VIEWED_LIMIT, RECENTLY_VIEWED_LIMIT),
        )
        .into_request("GetRecentlyViewedNotes", &query))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecentlyViewedData {
    note_browsing_histories: Connection<BrowsingHistory>,
}

#[derive(Deserialize)]
struct BrowsingHistory {
    note: Option<Note>,
}

fn recently_viewed_reshape(data: Value) -> Result<Value, ToolError> {
    let data: RecentlyViewedData = decode_data(data)?;
    let notes: Vec<Note> = data
        .note_browsing_histories
        .into_nodes()
        .into_iter()
        .filter_map(|history| history.note)
        .collect();
    encode(&notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubClient;

    fn arguments(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn search_keeps_only_notes() {
        let client = StubClient::responding(json!({
            "search": {
                "edges": [
                    { "node": { "document": {
                        "__typename": "Note",
                        "id": "note-1",
                        "title": "Launch plan",
                        "author": { "id": "u-1", "account": "alice", "realName": "Alice" },
                        "groups": [{ "id": "g-1", "name": "Product" }]
                    } } },
                    { "node": { "document": { "__typename": "Comment" } } },
                    { "node": { "document": null } }
                ]
            }
        }));

        let result = search_notes()
            .execute(&client, &arguments(json!({ "query": "launch plan" })))
            .await
            .unwrap();

        assert_eq!(
            result,
            json!([{
                "id": "note-1",
                "title": "Launch plan",
                "author": { "id": "u-1", "account": "alice", "realName": "Alice" },
                "groups": [{ "id": "g-1", "name": "Product" }]
            }])
        );
    }

    #[tokio::test]
    async fn search_skips_null_edges() {
        let client = StubClient::responding(json!({
            "search": {
                "edges": [
                    null,
                    { "node": null },
                    { "node": { "document": { "__typename": "Note", "id": "note-1" } } }
                ]
            }
        }));

        let result = search_notes()
            .execute(&client, &arguments(json!({ "query": "launch plan" })))
            .await
            .unwrap();

        assert_eq!(result, json!([{ "id": "note-1" }]));
    }

    #[tokio::test]
    async fn undecodable_notes_fail_the_search() {
        let client = StubClient::responding(json!({
            "search": {
                "edges": [
                    { "node": { "document": { "__typename": "Note", "title": "No id" } } }
                ]
            }
        }));

        let error = search_notes()
            .execute(&client, &arguments(json!({ "query": "launch plan" })))
            .await
            .unwrap_err();

        assert!(matches!(error, ToolError::UnexpectedResponse(_)));
    }

    #[tokio::test]
    async fn search_forwards_only_given_filters() {
        let client = StubClient::responding(json!({ "search": { "edges": [] } }));

        search_notes()
            .execute(
                &client,
                &arguments(json!({
                    "query": "launch plan",
                    "isArchived": false,
                    "userIds": ["u-1"]
                })),
            )
            .await
            .unwrap();

        let request = client.last_request();
        assert_eq!(
            Value::Object(request.variables),
            json!({ "query": "launch plan", "isArchived": false, "userIds": ["u-1"] })
        );
        assert!(request.query.contains("first: 15"));
    }

    #[tokio::test]
    async fn search_rejects_a_missing_query() {
        let client = StubClient::responding(json!({}));

        let error = search_notes()
            .execute(&client, &arguments(json!({ "query": " " })))
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "query is required");
    }

    #[tokio::test]
    async fn my_notes_clamps_the_limit() {
        let client = StubClient::responding(json!({
            "currentUser": { "latestNotes": { "totalCount": 1, "edges": [
                { "node": { "id": "note-1", "title": "Weekly" } }
            ] } }
        }));

        let result = get_my_notes()
            .execute(&client, &arguments(json!({ "limit": 120 })))
            .await
            .unwrap();

        assert_eq!(result, json!([{ "id": "note-1", "title": "Weekly" }]));
        assert_eq!(client.last_request().variables.get("limit"), Some(&json!(50)));
    }

    #[tokio::test]
    async fn my_notes_defaults_the_limit() {
        let client = StubClient::responding(json!({
            "currentUser": { "latestNotes": { "edges": [] } }
        }));

        get_my_notes()
            .execute(&client, &JsonObject::new())
            .await
            .unwrap();

        assert_eq!(client.last_request().variables.get("limit"), Some(&json!(15)));
    }

    #[tokio::test]
    async fn note_content_requests_attachments_on_demand() {
        let client = StubClient::responding(json!({
            "note": {
                "id": "note-1",
                "title": "Launch plan",
                "attachments": { "nodes": [
                    { "id": "a-1", "name": "diagram.png", "dataUrl": "data:image/png;base64,AAAA", "mimeType": "image/png" }
                ] },
                "comments": { "nodes": [] }
            }
        }));

        let result = get_note_content()
            .execute(
                &client,
                &arguments(json!({ "id": "note-1", "include_image_data": true })),
            )
            .await
            .unwrap();

        let request = client.last_request();
        assert!(request.query.contains("attachments(first: 3)"));
        assert_eq!(Value::Object(request.variables), json!({ "id": "note-1" }));
        assert_eq!(
            result.pointer("/attachments/nodes/0/mimeType"),
            Some(&json!("image/png"))
        );
    }

    #[tokio::test]
    async fn missing_note_is_an_error() {
        let client = StubClient::responding(json!({ "note": null }));

        let error = get_note_content()
            .execute(&client, &arguments(json!({ "id": "note-404" })))
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "Kibela returned no note");
    }

    #[tokio::test]
    async fn note_from_path_reduces_urls() {
        let client = StubClient::responding(json!({ "noteFromPath": { "id": "note-5154" } }));

        let result = get_note_from_path()
            .execute(
                &client,
                &arguments(json!({ "path": "https://acme.kibe.la/notes/5154" })),
            )
            .await
            .unwrap();

        let request = client.last_request();
        assert_eq!(request.variables.get("path"), Some(&json!("/notes/5154")));
        assert!(!request.query.contains("attachments"));
        assert_eq!(result, json!({ "id": "note-5154" }));
    }

    #[tokio::test]
    async fn recently_viewed_drops_missing_notes() {
        let client = StubClient::responding(json!({
            "noteBrowsingHistories": { "nodes": [
                { "note": { "id": "note-1" } },
                { "note": null },
                { "note": { "id": "note-2" } }
            ] }
        }));

        let result = get_recently_viewed_notes()
            .execute(&client, &arguments(json!({ "limit": 40 })))
            .await
            .unwrap();

        assert_eq!(result, json!([{ "id": "note-1" }, { "id": "note-2" }]));
        assert_eq!(client.last_request().variables.get("limit"), Some(&json!(15)));
    }

    #[tokio::test]
    async fn remote_errors_propagate() {
        let client = StubClient::failing("Note not found");

        let error = get_note_content()
            .execute(&client, &arguments(json!({ "id": "note-404" })))
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "GraphQL error: Note not found");
    }
}
