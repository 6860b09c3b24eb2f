mod all;
mod db;
mod error;
mod model;
mod pipeline;
mod priors;
mod types;
mod util;

use all::*;

use clap::Parser;

#[derive(Parser)]
#[clap(about = "Write reference reconstruction poses into a SfM database as pose priors.")]
struct Args {
  /// Path to the reconstruction database file.
  #[clap(long)]
  database: String,
  /// Path to the reference model directory (images.bin or images.txt).
  #[clap(long)]
  prior_model: String,
  /// Path to the directory of source images.
  #[clap(long)]
  images: String,
}

fn handle_error(err: &anyhow::Error) {
  for (i, e) in err.chain().enumerate() {
    println!("  {}: {}", i + 1, e);
  }
}

fn main() {
  if let Err(err) = run() {
    handle_error(&err);
    std::process::exit(1);
  }
}

fn run() -> Result<()> {
  let args = Args::parse();
  env_logger::Builder::new()
    .filter_level(LevelFilter::Info)
    .format(util::format_log)
    .init();

  let path_db_new = add_pose_priors(
    Path::new(&args.database),
    Path::new(&args.prior_model),
    Path::new(&args.images),
  )?;
  println!("Add pose prior done! New database: {}", path_db_new.display());
  Ok(())
}
