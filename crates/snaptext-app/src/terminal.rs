use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use kanal::{AsyncReceiver, AsyncSender};
use snaptext_core::ControllerEvent;
use snaptext_io::load_candidate;
use snaptext_types::{Command, DragEvent, ResultTab};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::ui::ViewState;

pub const HELP: &str = "\
commands:
  open <path>          select an image file
  drag enter|over|leave
  drop <path>...       drop files on the upload area
  remove               clear the selected image
  camera               open the camera
  capture | retake | use | close
  submit               send the image for text extraction
  back                 return to the upload view after a failure
  tab text|api         switch result tab
  copy                 copy the visible result
  new                  start a new query
  status | help | quit";

/// One parsed terminal line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Open(PathBuf),
    Drop(Vec<PathBuf>),
    Command(Command),
    Status,
    Help,
    Quit,
    Empty,
}

pub fn parse(line: &str) -> anyhow::Result<Input> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let input = match (word.to_ascii_lowercase().as_str(), rest) {
        ("", _) => Input::Empty,
        ("open", "") => bail!("usage: open <path>"),
        ("open", path) => Input::Open(PathBuf::from(path)),
        ("drag", "enter") => Input::Command(Command::Drag(DragEvent::Enter)),
        ("drag", "over") => Input::Command(Command::Drag(DragEvent::Over)),
        ("drag", "leave") => Input::Command(Command::Drag(DragEvent::Leave)),
        ("drag", _) => bail!("usage: drag enter|over|leave"),
        ("drop", paths) => Input::Drop(paths.split_whitespace().map(PathBuf::from).collect()),
        ("remove", "") => Input::Command(Command::RemoveImage),
        ("camera", "") => Input::Command(Command::OpenCamera),
        ("capture", "") => Input::Command(Command::CaptureFrame),
        ("retake", "") => Input::Command(Command::RetakePhoto),
        ("use", "") => Input::Command(Command::UsePhoto),
        ("close", "") => Input::Command(Command::CloseCamera),
        ("submit", "") => Input::Command(Command::Submit),
        ("back", "") => Input::Command(Command::Recover),
        ("tab", "text") => Input::Command(Command::SwitchTab(ResultTab::ExtractedText)),
        ("tab", "api") => Input::Command(Command::SwitchTab(ResultTab::ApiResponse)),
        ("tab", _) => bail!("usage: tab text|api"),
        ("copy", "") => Input::Command(Command::CopyActiveTab),
        ("new", "") => Input::Command(Command::ResetSession),
        ("status", "") => Input::Status,
        ("help", "") => Input::Help,
        ("quit" | "exit", "") => Input::Quit,
        (other, _) => bail!("Unknown command `{other}`, try `help`"),
    };
    Ok(input)
}

/// Blocking stdin reader on its own thread, so a pending read never holds up exit
pub fn spawn_stdin_reader() -> AsyncReceiver<String> {
    let (tx, rx) = kanal::bounded::<String>(16);

    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to read stdin: {e}");
                    break;
                }
            }
        }
    });

    rx.to_async()
}

/// Turns terminal lines into controller commands
pub async fn input_loop(
    lines: AsyncReceiver<String>,
    commands: AsyncSender<ControllerEvent>,
    view: Arc<RwLock<ViewState>>,
    max_image_bytes: u64,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    println!("{HELP}");

    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.recv() => match line {
                Ok(line) => line,
                Err(_) => {
                    tracing::info!("Input closed");
                    commands.send(Command::Shutdown.into()).await?;
                    break;
                }
            },
        };

        let command = match parse(&line) {
            Ok(Input::Empty) => continue,
            Ok(Input::Help) => {
                println!("{HELP}");
                continue;
            }
            Ok(Input::Status) => {
                println!("{}", view.read().await.summary());
                continue;
            }
            Ok(Input::Quit) => {
                commands.send(Command::Shutdown.into()).await?;
                break;
            }
            Ok(Input::Command(command)) => command,
            Ok(Input::Open(path)) => match load_candidate(&path, max_image_bytes).await {
                Ok(candidate) => Command::SelectImage(candidate),
                Err(e) => {
                    eprintln!("{e:#}");
                    continue;
                }
            },
            Ok(Input::Drop(paths)) => {
                let mut items = Vec::with_capacity(paths.len());
                for path in &paths {
                    match load_candidate(path, max_image_bytes).await {
                        Ok(candidate) => items.push(candidate),
                        Err(e) => {
                            tracing::warn!("Skipping dropped file: {e:#}");
                            eprintln!("{e:#}");
                        }
                    }
                }
                Command::Drag(DragEvent::Drop(items))
            }
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        commands.send(command.into()).await?;
    }

    Ok(())
}
