use kibela_client::GraphQLRequest;
use kibela_client::model::{Connection, LikePayload, User};
use rmcp::model::JsonObject;
use serde::Deserialize;
use serde_json::{Value, json};

use super::arguments::{Variables, decode};
use super::operation::{Operation, Validation, decode_data, encode};
use crate::errors::ToolError;

pub const GET_USERS: &str = "kibela_get_users";
pub const LIKE_NOTE: &str = "kibela_like_note";
pub const UNLIKE_NOTE: &str = "kibela_unlike_note";

const USERS_PAGE_SIZE: u32 = 100;
const LIKE_LIKERS_PAGE_SIZE: usize = 3;
const UNLIKE_LIKERS_PAGE_SIZE: usize = 10;

pub(super) fn get_users() -> Operation {
    Operation::builder()
        .name(GET_USERS)
        .description("Get list of users")
        .input_schema(json!({ "type": "object", "properties": {} }))
        .request(users_request)
        .reshape(users_reshape)
        .build()
}

fn users_request(_arguments: &JsonObject) -> Result<GraphQLRequest, ToolError> {
    let query = format!(
        "query GetUsers {{\n  users(first: {USERS_PAGE_SIZE}) {{\n    nodes {{ id account realName }}\n  }}\n}}"
    );
    Ok(Variables::new().into_request("GetUsers", &query))
}

#[derive(Deserialize)]
struct UsersData {
    users: Connection<User>,
}

fn users_reshape(data: Value) -> Result<Value, ToolError> {
    let data: UsersData = decode_data(data)?;
    encode(&data.users.into_nodes())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteIdInput {
    note_id: String,
}

fn note_id_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "noteId": { "type": "string", "description": "Note ID" }
        },
        "required": ["noteId"]
    })
}

/// `like` and `unlike` share their shape and differ in the likers page size
fn toggle_like_request(
    arguments: &JsonObject,
    operation_name: &str,
    mutation: &str,
    input_type: &str,
    likers_page_size: usize,
) -> Result<GraphQLRequest, ToolError> {
    let input: NoteIdInput = decode(arguments)?;
    let query = format!(
        "mutation {operation_name}($input: {input_type}!) {{
  {mutation}(input: $input) {{
    clientMutationId
    likers(first: {likers_page_size}) {{
      nodes {{ id account realName }}
    }}
  }}
}}"
    );

    Ok(Variables::new()
        .set("input", json!({ "noteId": input.note_id }))
        .into_request(operation_name, &query))
}

pub(super) fn like_note() -> Operation {
    Operation::builder()
        .name(LIKE_NOTE)
        .description("Like a note")
        .input_schema(note_id_schema())
        .validation(Validation::Strict)
        .request(like_request)
        .reshape(like_reshape)
        .build()
}

fn like_request(arguments: &JsonObject) -> Result<GraphQLRequest, ToolError> {
    toggle_like_request(
        arguments,
        "LikeNote",
        "like",
        "LikeInput",
        LIKE_LIKERS_PAGE_SIZE,
    )
}

#[derive(Deserialize)]
struct LikeData {
    like: Option<LikePayload>,
}

fn like_reshape(data: Value) -> Result<Value, ToolError> {
    let data: LikeData = decode_data(data)?;
    let payload = data.like.ok_or(ToolError::MissingField("like payload"))?;
    encode(&payload.truncate_likers(LIKE_LIKERS_PAGE_SIZE))
}

pub(super) fn unlike_note() -> Operation {
    Operation::builder()
        .name(UNLIKE_NOTE)
        .description("Unlike a note")
        .input_schema(note_id_schema())
        .validation(Validation::Strict)
        .request(unlike_request)
        .reshape(unlike_reshape)
        .build()
}

fn unlike_request(arguments: &JsonObject) -> Result<GraphQLRequest, ToolError> {
    toggle_like_request(
        arguments,
        "UnlikeNote",
        "unlike",
        "UnlikeInput",
        UNLIKE_LIKERS_PAGE_SIZE,
    )
}

#[derive(Deserialize)]
struct UnlikeData {
    unlike: Option<LikePayload>,
}

fn unlike_reshape(data: Value) -> Result<Value, ToolError> {
    let data: UnlikeData = decode_data(data)?;
    let payload = data
        .unlike
        .ok_or(ToolError::MissingField("unlike payload"))?;
    encode(&payload.truncate_likers(UNLIKE_LIKERS_PAGE_SIZE))
}
