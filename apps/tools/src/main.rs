use std::sync::{atomic::Ordering, Arc};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{
    scene::{
        backend::HeadlessLoader,
        input::{ListenerRegistry, ScreenPoint},
        SceneInput,
    },
    EventTarget, SceneHost, SceneOptions, SceneStatus, SurfaceRegion,
};
use serde_json::Value;
use shared::{
    content,
    domain::SkillCategory,
    protocol::{ContactFailure, ContactForm},
    validation::validate_contact,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "warn")]
    log_filter: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the static content feeds as JSON.
    Content {
        #[arg(value_enum, default_value_t = Feed::All)]
        feed: Feed,
        /// Only featured projects.
        #[arg(long)]
        featured: bool,
        /// Restrict skills to one category.
        #[arg(long, value_parser = parse_category)]
        category: Option<SkillCategory>,
    },
    /// Run the contact form validation the server applies.
    ValidateContact {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        message: String,
    },
    /// Mount the background scene on the headless backend and report what it
    /// allocated, drew and released.
    SimulateScene {
        #[arg(long, default_value_t = 800)]
        width: u32,
        #[arg(long, default_value_t = 600)]
        height: u32,
        #[arg(long, default_value_t = 120)]
        frames: u32,
        #[arg(long)]
        seed: Option<u64>,
        /// Make draws fail after this many frames.
        #[arg(long)]
        fail_after: Option<usize>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Feed {
    All,
    Skills,
    Experiences,
    Education,
    Projects,
    Social,
}

fn parse_category(raw: &str) -> Result<SkillCategory, String> {
    serde_json::from_value(Value::String(raw.to_ascii_lowercase()))
        .map_err(|_| format!("unknown skill category '{raw}'"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log_filter)?)
        .init();

    match cli.command {
        Command::Content {
            feed,
            featured,
            category,
        } => {
            let json = match feed {
                Feed::All => serde_json::to_string_pretty(&content::bundle())?,
                Feed::Skills => {
                    let skills = match category {
                        Some(category) => content::skills_in(category),
                        None => content::skills(),
                    };
                    serde_json::to_string_pretty(&skills)?
                }
                Feed::Experiences => serde_json::to_string_pretty(&content::experiences())?,
                Feed::Education => serde_json::to_string_pretty(&content::education())?,
                Feed::Projects => {
                    let projects = if featured {
                        content::featured_projects()
                    } else {
                        content::projects()
                    };
                    serde_json::to_string_pretty(&projects)?
                }
                Feed::Social => serde_json::to_string_pretty(&content::social_links())?,
            };
            println!("{json}");
        }
        Command::ValidateContact {
            name,
            email,
            message,
        } => {
            let form = ContactForm {
                name,
                email,
                message,
            };
            match validate_contact(&form) {
                Ok(valid) => {
                    info!(name = %valid.name, email = %valid.email, "contact form is valid");
                    println!("valid contact from {} <{}>", valid.name, valid.email);
                }
                Err(validation) => {
                    let failure = ContactFailure::validation(validation.issues);
                    println!("{}", serde_json::to_string_pretty(&failure)?);
                    bail!("contact form rejected with {} issue(s)", failure.details.len());
                }
            }
        }
        Command::SimulateScene {
            width,
            height,
            frames,
            seed,
            fail_after,
        } => simulate_scene(width, height, frames, seed, fail_after).await?,
    }

    Ok(())
}

async fn simulate_scene(
    width: u32,
    height: u32,
    frames: u32,
    seed: Option<u64>,
    fail_after: Option<usize>,
) -> Result<()> {
    let loader = match fail_after {
        Some(limit) => HeadlessLoader::failing_after(limit),
        None => HeadlessLoader::new(),
    };
    let stats = loader.stats();
    let registry = Arc::new(ListenerRegistry::new());
    let options = SceneOptions {
        seed,
        ..SceneOptions::default()
    };
    let host = SceneHost::mount(
        SurfaceRegion::new(width, height),
        Arc::new(loader),
        Arc::clone(&registry) as Arc<dyn EventTarget>,
        options,
    );

    let status = host.settled().await;
    println!("scene status after load: {status:?}");
    if status == SceneStatus::Running {
        registry.dispatch(SceneInput::PointerMove {
            position: ScreenPoint {
                x: width as f32,
                y: 0.0,
            },
            window_width: width,
            window_height: height,
        });
        tokio::time::sleep(options.frame_interval * frames).await;
        if let Some((x, y)) = host.target_rotation() {
            println!("target rotation: x={x:.3} y={y:.3}");
        }
    }
    let final_status = host.status();
    println!("scene status before unmount: {final_status:?}");
    println!("listeners while mounted: {}", registry.listener_count());

    host.unmount();
    host.unmount();

    println!(
        "frames drawn: {}",
        stats.frames_drawn.load(Ordering::SeqCst)
    );
    println!(
        "buffers uploaded/released: {}/{}",
        stats.buffers_uploaded.load(Ordering::SeqCst),
        stats.buffers_released.load(Ordering::SeqCst)
    );
    println!(
        "surfaces created/released: {}/{}",
        stats.surfaces_created.load(Ordering::SeqCst),
        stats.surfaces_released.load(Ordering::SeqCst)
    );
    println!(
        "contexts lost: {}",
        stats.contexts_lost.load(Ordering::SeqCst)
    );
    println!("listeners after unmount: {}", registry.listener_count());

    if stats.live_buffers() != 0 || stats.live_surfaces() != 0 {
        bail!("scene leaked backend resources");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_names_parse_case_insensitively() {
        assert_eq!(parse_category("Backend"), Ok(SkillCategory::Backend));
        assert_eq!(parse_category("tools"), Ok(SkillCategory::Tools));
        assert!(parse_category("cooking").is_err());
    }

    #[test]
    fn cli_accepts_each_subcommand() {
        let cli = Cli::try_parse_from(["tools", "content", "projects", "--featured"])
            .expect("content");
        assert!(matches!(
            cli.command,
            Command::Content {
                feed: Feed::Projects,
                featured: true,
                ..
            }
        ));

        let cli = Cli::try_parse_from([
            "tools",
            "validate-contact",
            "--name",
            "Ann Lee",
            "--email",
            "ann@example.com",
        ])
        .expect("validate");
        assert!(matches!(cli.command, Command::ValidateContact { .. }));

        let cli = Cli::try_parse_from(["tools", "simulate-scene", "--frames", "10", "--seed", "3"])
            .expect("simulate");
        assert!(matches!(
            cli.command,
            Command::SimulateScene {
                frames: 10,
                seed: Some(3),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn simulated_scene_releases_everything() {
        simulate_scene(320, 240, 5, Some(1), None)
            .await
            .expect("no leaks");
    }

    #[tokio::test]
    async fn simulated_render_failure_still_releases_everything() {
        simulate_scene(320, 240, 5, Some(1), Some(2))
            .await
            .expect("no leaks");
    }
}
