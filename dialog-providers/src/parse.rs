use anyhow::{Context, anyhow};
use dialog_core::types::{ConversationTurn, DialogList, UploadResult};
use serde::Deserialize;

pub fn parse_dialog_list(body: &[u8]) -> anyhow::Result<DialogList> {
    let list: DialogList = serde_json::from_slice(body).context("decode dialog list JSON")?;
    Ok(list)
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    id: Option<String>,
}

pub fn parse_upload_response(body: &[u8]) -> anyhow::Result<UploadResult> {
    let resp: UploadResponse =
        serde_json::from_slice(body).context("decode upload response JSON")?;
    let dialog_id = resp
        .id
        .ok_or_else(|| anyhow!("no id in upload response"))?;
    Ok(UploadResult { dialog_id })
}

pub fn parse_conversation_turn(body: &[u8]) -> anyhow::Result<ConversationTurn> {
    let turn: ConversationTurn =
        serde_json::from_slice(body).context("decode conversation JSON")?;
    Ok(turn)
}
