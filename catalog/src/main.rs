use std::path::PathBuf;

use anyhow::Result;
use gtfs::GTFS;
use log::info;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(
    name = "catalog",
    about = "Convert a GTFS feed into PTNA catalog entries for train routes."
)]
struct Options {
    /// directory containing the unzipped GTFS files
    #[structopt(short = "g", long = "gtfsdir", parse(from_os_str))]
    gtfs_dir: PathBuf,

    /// output file, json
    #[structopt(short = "o", long = "outfile", parse(from_os_str))]
    outfile: PathBuf,

    /// feed identifier - value for gtfs_feed
    #[structopt(long, default_value = "IL-MOT")]
    feed: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let options = Options::from_args();

    let gtfs = GTFS::load_from_dir(&options.gtfs_dir)?;
    let entries = catalog::build(&gtfs, &options.feed);

    info!(
        "Writing {} catalog entries to {}",
        entries.len(),
        options.outfile.display()
    );
    // serde_json leaves non-ASCII text alone, which is what PTNA expects
    std::fs::write(&options.outfile, serde_json::to_string(&entries)?)?;
    Ok(())
}
