//! Line-oriented chat loop. Slash commands manage sessions and documents;
//! everything else is sent to the model.

use std::io::{self, Write};
use std::path::Path;

use folio_core::Workspace;

const HELP: &str = "\
Commands:
  /open <path>          attach a PDF (uploads and summarizes it)
  /summary              show the document summary
  /instructions <text>  set the system directive for future sessions
  /sessions             list saved sessions
  /load <id>            switch to a saved session
  /new                  start a fresh session
  /delete <id>          delete a saved session
  /help                 show this help
  /quit                 exit
Anything else is sent as a question about the document.";

pub async fn run(workspace: &mut Workspace) -> Result<(), Box<dyn std::error::Error>> {
    println!("Type /help for commands.");

    loop {
        let Some(line) = prompt_line("> ")? else {
            break; // EOF
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix('/') {
            if command == "quit" || command == "exit" {
                break;
            }
            if let Err(err) = handle_command(workspace, command).await {
                eprintln!("error: {err}");
            }
            continue;
        }

        if !workspace.document_ready() {
            println!("No document attached. Use /open <path> first.");
            continue;
        }

        match workspace.send(line).await {
            Ok(reply) => println!("\n{reply}\n"),
            // Failures roll the message back; the transcript stays as it was.
            Err(err) => eprintln!("error: {err}"),
        }
    }

    Ok(())
}

async fn handle_command(
    workspace: &mut Workspace,
    command: &str,
) -> Result<(), folio_core::Error> {
    let (name, arg) = match command.split_once(' ') {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "open" => {
            if arg.is_empty() {
                println!("usage: /open <path>");
                return Ok(());
            }
            println!("Uploading document and generating summary...");
            workspace.attach_document(Path::new(arg)).await?;
            println!("Document ready. Use /summary to read the summary.");
        }
        "summary" => match workspace.summary() {
            Some(summary) => println!("\n{summary}\n"),
            None => println!("No summary yet; attach a document with /open."),
        },
        "instructions" => {
            if arg.is_empty() {
                println!("Current instructions: {}", workspace.instructions());
            } else {
                workspace.set_instructions(arg);
                println!("Instructions updated; they apply on the next rehydration.");
            }
        }
        "sessions" => {
            let sessions = workspace.list_sessions()?;
            if sessions.is_empty() {
                println!("No saved sessions.");
            }
            for session in sessions {
                let title = if session.title.is_empty() {
                    "(untitled)"
                } else {
                    &session.title
                };
                println!(
                    "{}  {}  {}",
                    session.id,
                    session.timestamp.format("%Y-%m-%d"),
                    title
                );
            }
        }
        "load" => {
            if arg.is_empty() {
                println!("usage: /load <id>");
                return Ok(());
            }
            workspace.load_session(arg)?;
            println!("Loaded session {arg} ({} turns).", workspace.turns().len());
            if workspace.local_document().is_some() {
                println!("Re-uploading the session's document...");
                workspace.resume_document().await?;
                println!("Document ready.");
            } else {
                println!("The session's document is no longer on disk; use /open to attach one.");
            }
        }
        "new" => {
            workspace.new_session();
            println!("Started a fresh session.");
        }
        "delete" => {
            if arg.is_empty() {
                println!("usage: /delete <id>");
                return Ok(());
            }
            workspace.delete_session(arg)?;
            println!("Deleted session {arg}.");
        }
        "help" => println!("{HELP}"),
        other => println!("Unknown command /{other}. Type /help for commands."),
    }

    Ok(())
}

fn prompt_line(prompt: &str) -> io::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut input = String::new();
    let bytes = io::stdin().read_line(&mut input)?;
    if bytes == 0 {
        return Ok(None);
    }
    Ok(Some(input))
}
