
//! The command line driver: compresses a PPM image into the fixed-ratio
//! compressed format, or decompresses such a stream back into a PPM.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::exit;

use clap::Parser;

use rpeg::compression;
use rpeg::error::UnitResult;
use rpeg::image::ppm;


#[derive(Debug, Parser)]
#[command(name = "rpeg", version, about = "Fixed-ratio lossy compression for PPM images")]
struct Arguments {

    /// Compress a PPM image into a compressed stream (the default).
    #[arg(short = 'c', long, conflicts_with = "decompress")]
    compress: bool,

    /// Decompress a previously compressed stream back into a PPM image.
    #[arg(short = 'd', long)]
    decompress: bool,

    /// The input file. Standard input is read when omitted.
    file: Option<PathBuf>,
}

fn main() {
    let arguments = Arguments::parse();

    if let Err(error) = run(&arguments) {
        eprintln!("rpeg: {}", error);
        exit(1);
    }
}

fn run(arguments: &Arguments) -> UnitResult {
    let stdin = io::stdin();
    let mut input: Box<dyn Read> = match &arguments.file {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(stdin.lock()),
    };

    let stdout = io::stdout();
    let mut output = BufWriter::new(stdout.lock());

    if arguments.decompress {
        let image = compression::decompress(&mut input)?;
        ppm::write(&mut output, &image)?;
    }
    else {
        let image = ppm::read(&mut input)?;
        compression::compress(&image, &mut output)?;
    }

    output.flush()?;
    Ok(())
}
