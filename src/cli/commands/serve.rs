//! Single-page chat UI served over HTTP.
//!
//! `GET /` returns the page; a small JSON API backs it. Sessions are
//! in-memory only and live for the lifetime of the process. The
//! session lock is held to read or append the transcript, never across
//! the agent call.

use crate::agent::Agent;
use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::credential;
use crate::groq;
use crate::session::{Conversation, Message};
use crate::tools::ToolRegistry;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

/// One browser session: transcript plus bookkeeping.
struct Session {
    created_at: DateTime<Utc>,
    conversation: Conversation,
}

impl Session {
    fn new() -> Self {
        Self {
            created_at: Utc::now(),
            conversation: Conversation::new(),
        }
    }
}

/// Shared application state.
struct AppState {
    settings: Settings,
    prompts: Prompts,
    sessions: Mutex<HashMap<Uuid, Session>>,
}

/// Run the HTTP server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;

    let state = Arc::new(AppState {
        settings,
        prompts,
        sessions: Mutex::new(HashMap::new()),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", get(get_session))
        .route("/api/sessions/{id}/messages", post(post_message))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Regne Web Chat");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Chat UI", "GET  /");
    Output::kv("Health", "GET  /health");
    Output::kv("New Session", "POST /api/sessions");
    Output::kv("Transcript", "GET  /api/sessions/:id");
    Output::kv("Ask", "POST /api/sessions/:id/messages");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Serialize)]
struct CreateSessionResponse {
    session_id: Uuid,
}

#[derive(Serialize)]
struct SessionResponse {
    session_id: Uuid,
    created_at: DateTime<Utc>,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct MessageRequest {
    /// Key for this request; the server never stores it.
    #[serde(default)]
    api_key: Option<String>,
    question: String,
}

#[derive(Serialize)]
struct MessageResponse {
    answer: String,
    tool_calls: Vec<ToolCallInfo>,
    iterations: usize,
}

#[derive(Serialize)]
struct ToolCallInfo {
    name: String,
    arguments: String,
    result: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

// === Handlers ===

async fn index() -> impl IntoResponse {
    Html(INDEX_HTML)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session_id = Uuid::new_v4();
    state
        .sessions
        .lock()
        .expect("session store lock poisoned")
        .insert(session_id, Session::new());

    Json(CreateSessionResponse { session_id })
}

async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let sessions = state.sessions.lock().expect("session store lock poisoned");

    match sessions.get(&id) {
        Some(session) => Json(SessionResponse {
            session_id: id,
            created_at: session.created_at,
            messages: session.conversation.messages().to_vec(),
        })
        .into_response(),
        None => error_response(StatusCode::NOT_FOUND, format!("Session not found: {}", id)),
    }
}

async fn post_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<MessageRequest>,
) -> impl IntoResponse {
    let question = req.question.trim().to_string();
    if question.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Please enter a question to solve");
    }

    let key = match credential::resolve(req.api_key.as_deref(), &state.settings) {
        Some(key) => key,
        None => {
            return error_response(
                StatusCode::UNAUTHORIZED,
                "Please enter your Groq API key to continue",
            )
        }
    };

    // Append the question and snapshot the transcript for the run.
    let conversation = {
        let mut sessions = state.sessions.lock().expect("session store lock poisoned");
        match sessions.get_mut(&id) {
            Some(session) => {
                session.conversation.push_user(&question);
                session.conversation.clone()
            }
            None => {
                return error_response(StatusCode::NOT_FOUND, format!("Session not found: {}", id))
            }
        }
    };

    let registry = match ToolRegistry::standard(&key, &state.settings, &state.prompts) {
        Ok(registry) => registry,
        Err(e) => return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    let client = groq::create_client(&key, &state.settings.llm);
    let agent = Agent::new(client, registry, &state.settings, &state.prompts);

    match agent.run(&conversation).await {
        Ok(outcome) => {
            let mut sessions = state.sessions.lock().expect("session store lock poisoned");
            if let Some(session) = sessions.get_mut(&id) {
                session.conversation.push_assistant(&outcome.answer);
            }

            Json(MessageResponse {
                answer: outcome.answer,
                tool_calls: outcome
                    .tool_calls
                    .into_iter()
                    .map(|c| ToolCallInfo {
                        name: c.name,
                        arguments: c.arguments,
                        result: c.result,
                    })
                    .collect(),
                iterations: outcome.iterations,
            })
            .into_response()
        }
        // The user message stays recorded; only the answer is withheld.
        Err(e) => error_response(StatusCode::BAD_GATEWAY, e.to_string()),
    }
}

// === Page ===

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Regne - Math Problem Solver and Data Search Assistant</title>
<style>
  body { font-family: system-ui, sans-serif; margin: 0; background: #f5f5f2; color: #222; }
  main { max-width: 720px; margin: 0 auto; padding: 1.5rem; }
  h1 { font-size: 1.3rem; }
  label { display: block; font-size: 0.85rem; color: #555; margin: 0.8rem 0 0.2rem; }
  input, textarea { width: 100%; box-sizing: border-box; padding: 0.5rem; border: 1px solid #ccc; border-radius: 6px; font: inherit; }
  textarea { min-height: 4.5rem; resize: vertical; }
  button { margin-top: 0.8rem; padding: 0.5rem 1.2rem; border: 0; border-radius: 6px; background: #2563eb; color: white; font: inherit; cursor: pointer; }
  button:disabled { background: #9db7e8; cursor: wait; }
  #transcript { margin-top: 1.2rem; display: flex; flex-direction: column; gap: 0.5rem; max-height: 50vh; overflow-y: auto; }
  .msg { padding: 0.6rem 0.8rem; border-radius: 8px; white-space: pre-wrap; }
  .msg.user { background: #dbeafe; align-self: flex-end; }
  .msg.assistant { background: #fff; border: 1px solid #e2e2de; align-self: flex-start; }
  #notice { margin-top: 0.8rem; font-size: 0.9rem; min-height: 1.2rem; }
  #notice.info { color: #2563eb; }
  #notice.warning { color: #b45309; }
  #notice.error { color: #b91c1c; }
  .trace { margin-top: 0.4rem; font-size: 0.8rem; color: #888; white-space: pre-wrap; }
</style>
</head>
<body>
<main>
  <h1>Text to Math Problem Solver and Data Search Assistant</h1>

  <label for="api-key">Groq API key</label>
  <input id="api-key" type="password" autocomplete="off" placeholder="gsk_...">

  <div id="transcript"></div>
  <div id="notice"></div>

  <label for="question">Enter your question here:</label>
  <textarea id="question">How many cookies did you sell if you sold 320 chocolate cookies and 270 vanilla cookies?</textarea>

  <button id="submit">Find the answer</button>
</main>
<script>
let sessionId = null;

function notice(text, kind) {
  const el = document.getElementById('notice');
  el.textContent = text;
  el.className = kind || '';
}

async function init() {
  const res = await fetch('/api/sessions', { method: 'POST' });
  const data = await res.json();
  sessionId = data.session_id;
  await refresh();
}

async function refresh() {
  const res = await fetch('/api/sessions/' + sessionId);
  if (!res.ok) return;
  const data = await res.json();
  const log = document.getElementById('transcript');
  log.innerHTML = '';
  for (const msg of data.messages) {
    const div = document.createElement('div');
    div.className = 'msg ' + msg.role;
    div.textContent = msg.content;
    log.appendChild(div);
  }
  log.scrollTop = log.scrollHeight;
}

function showTrace(toolCalls) {
  if (!toolCalls || toolCalls.length === 0) return;
  const log = document.getElementById('transcript');
  const div = document.createElement('div');
  div.className = 'trace';
  div.textContent = toolCalls.map(c => '[' + c.name + '] ' + c.arguments).join('\n');
  log.appendChild(div);
  log.scrollTop = log.scrollHeight;
}

async function submitQuestion() {
  const key = document.getElementById('api-key').value.trim();
  const question = document.getElementById('question').value.trim();

  if (!question) {
    notice('Please enter a question to solve', 'warning');
    return;
  }
  if (!key) {
    notice('Please enter your Groq API key to continue', 'info');
    return;
  }

  const button = document.getElementById('submit');
  button.disabled = true;
  button.textContent = 'Solving the problem...';
  notice('', '');

  try {
    const res = await fetch('/api/sessions/' + sessionId + '/messages', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ api_key: key, question: question })
    });
    const data = await res.json();
    await refresh();
    if (!res.ok) {
      notice(data.error, 'error');
    } else {
      showTrace(data.tool_calls);
    }
  } catch (err) {
    notice(String(err), 'error');
  }

  button.disabled = false;
  button.textContent = 'Find the answer';
}

document.getElementById('submit').addEventListener('click', submitQuestion);
window.addEventListener('load', init);
</script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_request_key_is_optional() {
        let req: MessageRequest = serde_json::from_str(r#"{"question": "2+2"}"#).unwrap();
        assert!(req.api_key.is_none());
        assert_eq!(req.question, "2+2");
    }

    #[test]
    fn test_new_session_starts_with_greeting() {
        let session = Session::new();
        assert_eq!(session.conversation.len(), 1);
    }

    #[test]
    fn test_page_has_masked_key_field() {
        assert!(INDEX_HTML.contains(r#"type="password""#));
        assert!(INDEX_HTML.contains("Find the answer"));
    }
}
