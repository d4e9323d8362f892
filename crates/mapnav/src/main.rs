use clap::{Parser, Subcommand};
use mapnav::animation::camera_target;
use mapnav::element::{ElementId, animation_order};
use mapnav::navigation::{NavElementKind, NavigationSession, StepDirection, step_km};
use mapnav::project::Project;
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "mapnav", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Socket of the running tourd daemon
    #[arg(short = 's', long, default_value = mapnav::DEFAULT_SOCKET_PATH)]
    socket: PathBuf,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Print the elements of a project in playback order
    Order { project: PathBuf },
    /// Print where the camera flies for each element
    Targets { project: PathBuf },
    /// Walk a cursor along a circle or line segment
    Walk {
        project: PathBuf,
        /// Id of the circle or line segment
        id: String,
        #[arg(short = 'z', long, default_value_t = 12.0)]
        zoom: f64,
        #[arg(short = 'n', long, default_value_t = 10)]
        steps: usize,
        #[arg(short = 'b', long)]
        backward: bool,
    },
    /// Start playback in the daemon
    Play,
    /// Stop playback in the daemon
    Stop,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Order { project } => print_order(&Project::load(project)?),
        Commands::Targets { project } => print_targets(&Project::load(project)?),
        Commands::Walk {
            project,
            id,
            zoom,
            steps,
            backward,
        } => {
            let direction = if backward {
                StepDirection::Backward
            } else {
                StepDirection::Forward
            };
            walk(&Project::load(project)?, ElementId::new(id), zoom, steps, direction)
        }
        Commands::Play => send_command(&cli.socket, "play"),
        Commands::Stop => send_command(&cli.socket, "stop"),
    }
}

fn print_order(project: &Project) -> anyhow::Result<()> {
    for (i, element) in animation_order(project).iter().enumerate() {
        println!(
            "{:>3}  {:<12} {:<24} {}",
            i,
            element.kind(),
            element.id(),
            element.created_at().unwrap_or(0)
        );
    }
    Ok(())
}

fn print_targets(project: &Project) -> anyhow::Result<()> {
    for element in animation_order(project) {
        match camera_target(&element) {
            Some(t) => println!(
                "{:<12} {:<24} {:>11.6} {:>11.6}  zoom {:.2}",
                element.kind(),
                element.id(),
                t.center.lat,
                t.center.lon,
                t.zoom
            ),
            None => println!("{:<12} {:<24} (no target)", element.kind(), element.id()),
        }
    }
    Ok(())
}

fn walk(
    project: &Project,
    id: ElementId,
    zoom: f64,
    steps: usize,
    direction: StepDirection,
) -> anyhow::Result<()> {
    let mut session = NavigationSession::new();
    println!("step {:.3} km at zoom {}", step_km(zoom), zoom);

    if let Some(circle) = project.circle(&id) {
        session.start(NavElementKind::Circle, id);
        for _ in 0..steps {
            session.step_circle(circle, zoom, direction);
            let p = session.circle_coords(circle);
            println!("{:>8.3}°  {:>11.6} {:>11.6}", session.angle_position, p.lat, p.lon);
        }
    } else if let Some(segment) = project.line_segment(&id) {
        session.start(NavElementKind::LineSegment, id);
        for _ in 0..steps {
            session.step_line(segment, zoom, direction);
            let p = session.line_coords(segment);
            println!("{:>8.4}   {:>11.6} {:>11.6}", session.progress, p.lat, p.lon);
        }
    } else {
        anyhow::bail!("No circle or line segment with id '{}'", id);
    }
    Ok(())
}

fn send_command(socket: &Path, cmd: &str) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(socket).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to tourd at {}: {}. Is tourd running?",
            socket.display(),
            e
        )
    })?;

    writeln!(stream, "{}", cmd)?;
    Ok(())
}
