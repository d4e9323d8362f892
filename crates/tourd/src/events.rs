use mapnav::element::ElementId;
use mapnav::navigation::{NavElementKind, StepDirection};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum NavCommand {
    Start(NavElementKind, ElementId),
    Step(StepDirection),
    Zoom(f64),
    Exit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Play,
    Stop,
    Navigate(NavCommand),
    ProjectReload,
    Quit,
}

#[derive(Error, Debug, PartialEq)]
pub enum EventParseError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command '{0}'")]
    Unknown(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
}

impl FromStr for AppEvent {
    type Err = EventParseError;

    /// One command per socket line, e.g. `play`, `nav circle c1`, `zoom 13.5`.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().ok_or(EventParseError::Empty)?;

        let event = match command.to_ascii_lowercase().as_str() {
            "play" => AppEvent::Play,
            "stop" => AppEvent::Stop,
            "reload" => AppEvent::ProjectReload,
            "quit" => AppEvent::Quit,
            "exit" => AppEvent::Navigate(NavCommand::Exit),
            "nav" => {
                const USAGE: &str = "nav <circle|line> <id>";
                let kind = match words.next().map(str::to_ascii_lowercase).as_deref() {
                    Some("circle") => NavElementKind::Circle,
                    Some("line") | Some("linesegment") => NavElementKind::LineSegment,
                    _ => return Err(EventParseError::Usage(USAGE)),
                };
                let id = words.next().ok_or(EventParseError::Usage(USAGE))?;
                AppEvent::Navigate(NavCommand::Start(kind, ElementId::new(id)))
            }
            "zoom" => {
                let level = words
                    .next()
                    .and_then(|w| w.parse::<f64>().ok())
                    .filter(|z| z.is_finite())
                    .ok_or(EventParseError::Usage("zoom <level>"))?;
                AppEvent::Navigate(NavCommand::Zoom(level))
            }
            other => match other.parse::<StepDirection>() {
                Ok(direction) => AppEvent::Navigate(NavCommand::Step(direction)),
                Err(_) => return Err(EventParseError::Unknown(command.to_string())),
            },
        };

        Ok(event)
    }
}
