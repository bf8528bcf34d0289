use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use url::Url;

use sliding_secret::terminal::{self, SyntaxImageLoader};
use sliding_secret::{fragment_of, logging, Draft, GridSize, ImageCheck, Session};

const DEFAULT_BASE_URL: &str = "http://localhost:8080/";

#[derive(Parser)]
#[command(
    name = "sliding-secret",
    version,
    about = "Hide a message behind a sliding-tile picture puzzle"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a shareable link for a new puzzle.
    Create {
        #[arg(long)]
        image: String,
        #[arg(long)]
        message: String,
        /// Grid side: 3 (easy), 4 (medium) or 5 (hard).
        #[arg(long, default_value = "3", value_parser = parse_grid)]
        size: GridSize,
        /// Page the link opens; its fragment is replaced by the token.
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base: Url,
    },
    /// Play a puzzle from a link or bare token.
    Play {
        link: String,
        /// Seed the shuffle for a reproducible board.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn parse_grid(value: &str) -> Result<GridSize, String> {
    let side: u64 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    GridSize::try_from(side).map_err(|err| err.to_string())
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Create {
            image,
            message,
            size,
            base,
        } => create(image, message, size, &base),
        Commands::Play { link, seed } => play(&link, seed),
    }
}

fn create(image: String, message: String, size: GridSize, base: &Url) -> Result<()> {
    let mut draft = Draft::new();
    draft.set_image_url(image);
    draft.set_secret_message(message);
    draft.set_grid(size);
    draft.check_image(&mut SyntaxImageLoader);
    if let ImageCheck::Invalid(err) = draft.image_check() {
        bail!("{err}");
    }

    let link = draft
        .generate(base)
        .context("cannot create a puzzle link")?;
    println!("Your {} puzzle is ready. Share this link:", size.label());
    println!("{}", link.url);
    Ok(())
}

fn play(link: &str, seed: Option<u64>) -> Result<()> {
    let mut session = Session::on_fragment_change(fragment_of(link));
    if let Some(notice) = session.notice() {
        bail!("{}", notice.message);
    }
    if session.config().is_none() {
        bail!("this link has no puzzle in it; use `sliding-secret create` to make one");
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    session.load_image(&mut SyntaxImageLoader, &mut rng);
    if let Session::ImageFailed { error, .. } = &session {
        bail!("Could not load the image for this puzzle: {error}");
    }

    terminal::run(&mut session, &mut rng).context("terminal play failed")?;

    let moves = session.board().map_or(0, |board| board.move_count());
    match session.secret_message() {
        Some(secret) => println!("Solved in {moves} moves. Secret message: {secret}"),
        None => println!("Left unsolved after {moves} moves."),
    }
    Ok(())
}
