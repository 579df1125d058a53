#[macro_use]
extern crate clap;

use clap::{App, Arg, SubCommand};
use mix::Cpu;
use std::fmt;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Debug)]
enum IOErrorContext {
    ReadInput,
    WriteOutput,
}

#[derive(Debug)]
enum Error {
    Mixal(mixal::Error),
    Exec(mix::ExecError, u16),
    Io(std::io::Error, IOErrorContext, PathBuf),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err, context, path) => write!(
                f,
                "{} file \"{}\" failed: {}",
                match context {
                    IOErrorContext::ReadInput => "Reading input",
                    IOErrorContext::WriteOutput => "Writing output",
                },
                path.display(),
                err
            ),
            Error::Mixal(err) => {
                writeln!(f, "Assembling input failed:")?;
                write!(f, "{}", err)
            }
            Error::Exec(err, address) => {
                write!(f, "execution failed at address {}: {}", address, err)
            }
        }
    }
}

fn main() {
    let matches = app_from_crate!()
        .subcommand(
            SubCommand::with_name("assemble")
                .about("Assembles MIXAL source into a memory image")
                .arg(
                    Arg::with_name("SRC")
                        .help("Sets the MIXAL source file to assemble")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::with_name("output")
                        .short("o")
                        .long("output")
                        .takes_value(true)
                        .value_name("OUTPUT")
                        .help("Sets the image file to write (defaults to SRC with a .mixword extension)"),
                ),
        )
        .subcommand(
            SubCommand::with_name("run")
                .about("Loads an assembled image and executes it")
                .arg(
                    Arg::with_name("IMAGE")
                        .help("Sets the memory image file to load")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            SubCommand::with_name("exec")
                .about("Assembles MIXAL source and immediately executes it")
                .arg(
                    Arg::with_name("SRC")
                        .help("Sets the MIXAL source file to assemble and run")
                        .required(true)
                        .index(1),
                ),
        )
        .get_matches();

    let result = match matches.subcommand() {
        ("assemble", Some(sub)) => {
            assemble(sub.value_of("SRC").unwrap(), sub.value_of("output"))
        }
        ("run", Some(sub)) => run(sub.value_of("IMAGE").unwrap()),
        ("exec", Some(sub)) => exec(sub.value_of("SRC").unwrap()),
        _ => {
            eprintln!("{}", matches.usage());
            std::process::exit(1);
        }
    };

    if let Err(err) = result {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

fn read_source(path: &Path) -> Result<String, Error> {
    let file = File::open(path)
        .map_err(|err| Error::Io(err, IOErrorContext::ReadInput, path.to_owned()))?;
    let mut source = String::new();
    BufReader::new(file)
        .read_to_string(&mut source)
        .map_err(|err| Error::Io(err, IOErrorContext::ReadInput, path.to_owned()))?;
    Ok(source)
}

fn assemble(src: &str, output: Option<&str>) -> Result<(), Error> {
    let src_path = Path::new(src);
    let source = read_source(src_path)?;

    let (assembled, _source_map) = mixal::assemble(&source).map_err(|err| {
        Error::Mixal(match src_path.to_str() {
            Some(path_str) => err.with_path(path_str),
            None => err,
        })
    })?;

    let output_path: PathBuf = output
        .map(PathBuf::from)
        .unwrap_or_else(|| src_path.with_extension("mixword"));

    mixword_image::write_image_file(&output_path, &assembled.memory, Some(assembled.start))
        .map_err(|err| Error::Io(err, IOErrorContext::WriteOutput, output_path))?;

    Ok(())
}

fn run(image: &str) -> Result<(), Error> {
    let image_path = Path::new(image);
    let (memory, start) = mixword_image::read_image_file(image_path, true)
        .map_err(|err| Error::Io(err, IOErrorContext::ReadInput, image_path.to_owned()))?;

    let mut cpu = Cpu::new();
    for (address, &word) in memory.iter().enumerate() {
        cpu.machine.write(address as i64, word).expect("image has exactly MEMORY_SIZE words");
    }
    cpu.machine.program_counter = start.unwrap_or(0);

    cpu.run(1_000_000)
        .map_err(|err| Error::Exec(err, cpu.machine.program_counter))
}

fn exec(src: &str) -> Result<(), Error> {
    let src_path = Path::new(src);
    let source = read_source(src_path)?;

    let (assembled, _source_map) = mixal::assemble(&source).map_err(|err| {
        Error::Mixal(match src_path.to_str() {
            Some(path_str) => err.with_path(path_str),
            None => err,
        })
    })?;

    let mut cpu = Cpu::new();
    for (address, &word) in assembled.memory.iter().enumerate() {
        cpu.machine.write(address as i64, word).expect("image has exactly MEMORY_SIZE words");
    }
    cpu.machine.program_counter = assembled.start;

    cpu.run(1_000_000)
        .map_err(|err| Error::Exec(err, cpu.machine.program_counter))
}
