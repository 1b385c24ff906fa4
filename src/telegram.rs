//! Telegram Bot API long-polling adapter.
//!
//! Each update is handed to the assistant on its own task, so a slow model
//! call in one chat never holds up the others.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::assistant::{Assistant, Reply};
use crate::error::{AppError, Result};

const API_BASE: &str = "https://api.telegram.org";

/// `sendMessage` rejects text longer than this many UTF-16 code units.
const MESSAGE_LIMIT: usize = 4096;

/// Split text into chunks Telegram will accept, breaking after a newline
/// where possible and mid-line only when a single line is too long.
fn split_message(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len: usize = line.chars().map(char::len_utf16).sum();
        if current_len + line_len > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if line_len <= limit {
            current.push_str(line);
            current_len += line_len;
            continue;
        }
        for c in line.chars() {
            if current_len + c.len_utf16() > limit {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            current.push(c);
            current_len += c.len_utf16();
        }
    }
    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> Result<T> {
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(AppError::Telegram(
                self.description.unwrap_or_else(|| "request failed".into()),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

impl Update {
    /// Chat id and text for plain text messages; everything else is ignored.
    pub fn text_message(self) -> Option<(i64, String)> {
        let message = self.message?;
        let text = message.text?;
        Some((message.chat.id, text))
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
}

#[derive(Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    base: String,
}

impl TelegramClient {
    pub fn new(token: &str, poll_timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(poll_timeout_secs + 30))
            .build()?;
        Ok(Self {
            client,
            base: format!("{API_BASE}/bot{token}"),
        })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{method}", self.base)
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        let body: ApiResponse<T> = resp.json().await?;
        body.into_result()
    }

    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>> {
        let resp = self
            .client
            .get(self.url("getUpdates"))
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", timeout_secs.to_string()),
                ("allowed_updates", "[\"message\"]".to_string()),
            ])
            .send()
            .await?;
        Self::decode(resp).await
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let resp = self
            .client
            .post(self.url("sendMessage"))
            .json(&SendMessage { chat_id, text })
            .send()
            .await?;
        Self::decode::<serde_json::Value>(resp).await?;
        Ok(())
    }

    pub async fn send_photo(&self, chat_id: i64, png: Vec<u8>, caption: &str) -> Result<()> {
        let photo = Part::bytes(png)
            .file_name("chart.png")
            .mime_str("image/png")?;
        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .part("photo", photo);
        let resp = self
            .client
            .post(self.url("sendPhoto"))
            .multipart(form)
            .send()
            .await?;
        Self::decode::<serde_json::Value>(resp).await?;
        Ok(())
    }

    /// Text first, split into as many messages as needed, then the chart. A
    /// failed photo upload does not undo the text reply.
    pub async fn deliver(&self, chat_id: i64, reply: Reply) -> Result<()> {
        for chunk in split_message(&reply.text, MESSAGE_LIMIT) {
            self.send_message(chat_id, &chunk).await?;
        }
        if let Some(chart) = reply.chart {
            if let Err(e) = self.send_photo(chat_id, chart.png, &chart.legend).await {
                tracing::warn!(chat_id, error = %e, "chart upload failed");
            }
        }
        Ok(())
    }
}

/// Poll until Ctrl-C.
pub async fn run(client: TelegramClient, assistant: Assistant, poll_timeout_secs: u64) -> Result<()> {
    let mut offset = 0i64;
    tracing::info!("polling for updates");

    loop {
        let updates = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                return Ok(());
            }
            res = client.get_updates(offset, poll_timeout_secs) => res,
        };

        let updates = match updates {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!(error = %e, "getUpdates failed");
                tokio::time::sleep(Duration::from_secs(3)).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);
            let Some((chat_id, text)) = update.text_message() else {
                continue;
            };

            let client = client.clone();
            let assistant = assistant.clone();
            tokio::spawn(async move {
                tracing::debug!(chat_id, text = %text, "message received");
                let reply = assistant.handle(&text).await;
                if let Err(e) = client.deliver(chat_id, reply).await {
                    tracing::warn!(chat_id, error = %e, "reply failed");
                }
            });
        }
    }
}
