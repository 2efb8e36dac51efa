//! Kibela operations exposed as MCP tools

mod arguments;
mod fragments;
mod groups;
mod notes;
mod operation;
mod users;

pub use groups::{GET_FOLDER_NOTES, GET_GROUP_FOLDERS, GET_GROUP_NOTES, GET_GROUPS};
pub use notes::{
    GET_MY_NOTES, GET_NOTE_CONTENT, GET_NOTE_FROM_PATH, GET_RECENTLY_VIEWED_NOTES, SEARCH_NOTES,
};
pub use operation::{Operation, Reshaper, RequestBuilder, Validation};
pub use users::{GET_USERS, LIKE_NOTE, UNLIKE_NOTE};

/// Every Kibela tool, in the order they are listed to clients
pub fn kibela_operations() -> Vec<Operation> {
    vec![
        notes::search_notes(),
        notes::get_my_notes(),
        notes::get_note_content(),
        groups::get_groups(),
        groups::get_group_folders(),
        groups::get_group_notes(),
        groups::get_folder_notes(),
        users::get_users(),
        users::like_note(),
        users::unlike_note(),
        notes::get_recently_viewed_notes(),
        notes::get_note_from_path(),
    ]
}
