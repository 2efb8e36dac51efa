use kibela_client::GraphQLRequest;
use kibela_client::model::{Connection, Folder, Group, Note};
use rmcp::model::JsonObject;
use serde::Deserialize;
use serde_json::{Value, json};

use super::arguments::{Variables, decode};
use super::fragments::NOTE_SUMMARY;
use super::operation::{Operation, decode_data, encode};
use crate::errors::ToolError;

pub const GET_GROUPS: &str = "kibela_get_groups";
pub const GET_GROUP_FOLDERS: &str = "kibela_get_group_folders";
pub const GET_GROUP_NOTES: &str = "kibela_get_group_notes";
pub const GET_FOLDER_NOTES: &str = "kibela_get_folder_notes";

const GROUPS_PAGE_SIZE: u32 = 10;
const FOLDERS_PAGE_SIZE: u32 = 30;
const NOTES_PAGE_SIZE: u32 = 10;
const NEWEST_FIRST: &str = "orderBy: { field: CONTENT_UPDATED_AT, direction: DESC }";

pub(super) fn get_groups() -> Operation {
    Operation::builder()
        .name(GET_GROUPS)
        .description("Get list of accessible groups")
        .input_schema(json!({ "type": "object", "properties": {} }))
        .request(groups_request)
        .reshape(groups_reshape)
        .build()
}

fn groups_request(_arguments: &JsonObject) -> Result<GraphQLRequest, ToolError> {
    let query = format!(
        "query GetGroups {{
  groups(first: {GROUPS_PAGE_SIZE}, ability: READABLE) {{
    nodes {{ id name description isPrivate canBeManaged canBeJoinedBySelf isJoined }}
  }}
}}"
    );
    Ok(Variables::new().into_request("GetGroups", &query))
}

#[derive(Deserialize)]
struct GroupsData {
    groups: Connection<Group>,
}

fn groups_reshape(data: Value) -> Result<Value, ToolError> {
    let data: GroupsData = decode_data(data)?;
    encode(&data.groups.into_nodes())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupFoldersInput {
    group_id: Option<String>,
    parent_folder_id: Option<String>,
}

pub(super) fn get_group_folders() -> Operation {
    Operation::builder()
        .name(GET_GROUP_FOLDERS)
        .description("Get folders in a group")
        .input_schema(json!({
            "type": "object",
            "properties": {
                "groupId": { "type": "string", "description": "Group ID" },
                "parentFolderId": { "type": "string", "description": "Parent folder ID" }
            },
            "required": ["groupId"]
        }))
        .request(group_folders_request)
        .reshape(group_folders_reshape)
        .build()
}

fn group_folders_request(arguments: &JsonObject) -> Result<GraphQLRequest, ToolError> {
    let input: GroupFoldersInput = decode(arguments)?;
    let query = format!(
        "query GetGroupFolders($groupId: ID!, $parentFolderId: ID) {{
  group(id: $groupId) {{
    folders(first: {FOLDERS_PAGE_SIZE}, active: true, parentFolderId: $parentFolderId) {{
      nodes {{
        id
        name
        fullName
        path
        canBeManaged
        parent {{ id name }}
        notes(first: {NOTES_PAGE_SIZE}, active: true, {NEWEST_FIRST}) {{
          nodes {{ {NOTE_SUMMARY} }}
        }}
      }}
    }}
  }}
}}"
    );

    Ok(Variables::new()
        .set_opt("groupId", input.group_id)
        .set_opt("parentFolderId", input.parent_folder_id)
        .into_request("GetGroupFolders", &query))
}

#[derive(Deserialize)]
struct GroupFoldersData {
    group: Option<GroupFolders>,
}

#[derive(Deserialize)]
struct GroupFolders {
    folders: Connection<Folder>,
}

fn group_folders_reshape(data: Value) -> Result<Value, ToolError> {
    let data: GroupFoldersData = decode_data(data)?;
    let group = data.group.ok_or(ToolError::MissingField("group"))?;
    encode(&group.folders.into_nodes())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupNotesInput {
    group_id: Option<String>,
}

pub(super) fn get_group_notes() -> Operation {
    Operation::builder()
        .name(GET_GROUP_NOTES)
        .description("Get notes in a group that are not attached to any folder")
        .input_schema(json!({
            "type": "object",
            "properties": {
                "groupId": { "type": "string", "description": "Group ID" }
            },
            "required": ["groupId"]
        }))
        .request(group_notes_request)
        .reshape(group_notes_reshape)
        .build()
}

fn group_notes_request(arguments: &JsonObject) -> Result<GraphQLRequest, ToolError> {
    let input: GroupNotesInput = decode(arguments)?;
    let query = format!(
        "query GetGroupNotes($groupId: ID!) {{
  group(id: $groupId) {{
    notes(first: {NOTES_PAGE_SIZE}, active: true, onlyNotAttachedFolder: true, {NEWEST_FIRST}) {{
      nodes {{ {NOTE_SUMMARY} }}
    }}
  }}
}}"
    );

    Ok(Variables::new()
        .set_opt("groupId", input.group_id)
        .into_request("GetGroupNotes", &query))
}

/// `group { notes }` and `folder { notes }`
#[derive(Deserialize)]
struct NotesHolder {
    notes: Connection<Note>,
}

#[derive(Deserialize)]
struct GroupNotesData {
    group: Option<NotesHolder>,
}

fn group_notes_reshape(data: Value) -> Result<Value, ToolError> {
    let data: GroupNotesData = decode_data(data)?;
    let group = data.group.ok_or(ToolError::MissingField("group"))?;
    encode(&group.notes.into_nodes())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FolderNotesInput {
    folder_id: Option<String>,
}

pub(super) fn get_folder_notes() -> Operation {
    Operation::builder()
        .name(GET_FOLDER_NOTES)
        .description("Get notes in a folder")
        .input_schema(json!({
            "type": "object",
            "properties": {
                "folderId": { "type": "string", "description": "Folder ID" }
            },
            "required": ["folderId"]
        }))
        .request(folder_notes_request)
        .reshape(folder_notes_reshape)
        .build()
}

fn folder_notes_request(arguments: &JsonObject) -> Result<GraphQLRequest, ToolError> {
    let input: FolderNotesInput = decode(arguments)?;
    let query = format!(
        "query GetFolderNotes($folderId: ID!) {{
  folder(id: $folderId) {{
    notes(first: {NOTES_PAGE_SIZE}, active: true, {NEWEST_FIRST}) {{
      nodes {{ {NOTE_SUMMARY} }}
    }}
  }}
}}"
    );

    Ok(Variables::new()
        .set_opt("folderId", input.folder_id)
        .into_request("GetFolderNotes", &query))
}

#[derive(Deserialize)]
struct FolderNotesData {
    folder: Option<NotesHolder>,
}

fn folder_notes_reshape(data: Value) -> Result<Value, ToolError> {
    let data: FolderNotesData = decode_data(data)?;
    let folder = data.folder.ok_or(ToolError::MissingField("folder"))?;
    encode(&folder.notes.into_nodes())
}
