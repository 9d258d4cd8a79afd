use super::{ ChatSession, GatewayTransport };
use crate::models::chat::{ ChatMessage, Role };
use log::info;
use std::io;
use tokio::io::{ AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt };

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Clear,
    Quit,
    Text(&'a str),
}

fn classify(line: &str) -> Input<'_> {
    match line.trim() {
        "/clear" => Input::Clear,
        "/quit" | "/exit" => Input::Quit,
        _ => Input::Text(line),
    }
}

fn speaker(message: &ChatMessage) -> &'static str {
    match message.role {
        Role::User => "You",
        Role::Assistant => "AI Agent",
    }
}

/// Line-oriented chat loop: each line is a message, `/clear` resets the
/// session and `/quit` (or end of input) leaves.
pub async fn run_chat<R, W, T>(
    reader: R,
    mut out: W,
    transport: &T
) -> io::Result<ChatSession>
    where R: AsyncBufRead + Unpin, W: AsyncWrite + Unpin, T: GatewayTransport + ?Sized
{
    let mut session = ChatSession::new();
    info!("Started chat session {}", session.id());
    out.write_all(b"Type a message, /clear to reset, /quit to leave.\n").await?;

    let mut lines = reader.lines();
    loop {
        out.write_all(b"> ").await?;
        out.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match classify(&line) {
            Input::Quit => {
                break;
            }
            Input::Clear => {
                session.clear();
                out.write_all(b"Conversation cleared.\n").await?;
            }
            Input::Text(text) => {
                session.set_input(text);
                let Some(conversation) = session.begin_submit() else {
                    continue;
                };
                if let Some(placeholder) = session.pending_placeholder() {
                    out.write_all(format!("AI Agent: {}\r", placeholder).as_bytes()).await?;
                    out.flush().await?;
                }
                let outcome = transport.send(&conversation).await;
                let reply = session.finish_submit(outcome);
                out.write_all(format!("{}: {}\n", speaker(reply), reply.content).as_bytes()).await?;
            }
        }
    }

    info!("Chat session {} ended with {} message(s)", session.id(), session.messages().len());
    Ok(session)
}
