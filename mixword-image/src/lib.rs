//! Binary persistence format for assembled MIX memory images and
//! individual words (spec.md §6). Grounded in the teacher's `vexfile`
//! crate: a small `byteorder`-based read/write pair plus
//! `read_file`/`write_file` convenience wrappers, generalized from the
//! teacher's length-prefixed `data`/`instructions` byte blobs to MIX's
//! fixed-format word records.
//!
//! A single [`mix::Word`] is one sign byte (`0` = `+`, `1` = `-`)
//! followed by its five base-64 byte values. A full memory image is
//! exactly [`mix::MEMORY_SIZE`] such records in address order, optionally
//! preceded by a little-endian `u16` giving the program's start address
//! (the `mix run` subcommand needs this to know where to set the
//! program counter; a bare word-for-word dump does not).

use byteorder::{ReadBytesExt, WriteBytesExt};
use mix::{Sign, Word, MEMORY_SIZE};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use util::Endian;

/// Write one word as a 6-byte record: a sign byte followed by its five
/// base-64 bytes.
pub fn write_word<W: Write>(writer: &mut W, word: Word) -> io::Result<()> {
    writer.write_u8(if word.is_negative() { 1 } else { 0 })?;
    writer.write_all(&word.bytes())
}

/// Read a 6-byte word record written by [`write_word`].
pub fn read_word<R: Read>(reader: &mut R) -> io::Result<Word> {
    let sign = if reader.read_u8()? != 0 {
        Sign::Minus
    } else {
        Sign::Plus
    };
    let mut bytes = [0u8; 5];
    reader.read_exact(&mut bytes)?;
    Word::new(sign, bytes).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))
}

/// Write a full memory image: `memory.len()` word records, optionally
/// preceded by a little-endian `u16` start address.
pub fn write_image<W: Write>(writer: &mut W, memory: &[Word], start: Option<u16>) -> io::Result<()> {
    if let Some(start) = start {
        writer.write_u16::<Endian>(start)?;
    }
    for &word in memory {
        write_word(writer, word)?;
    }
    Ok(())
}

/// Read exactly [`MEMORY_SIZE`] word records, optionally preceded by a
/// little-endian `u16` start address (pass `with_start = true` to expect
/// one, matching what [`write_image`] wrote).
pub fn read_image<R: Read>(reader: &mut R, with_start: bool) -> io::Result<(Vec<Word>, Option<u16>)> {
    let start = if with_start {
        Some(reader.read_u16::<Endian>()?)
    } else {
        None
    };

    let mut memory = Vec::with_capacity(MEMORY_SIZE);
    for _ in 0..MEMORY_SIZE {
        memory.push(read_word(reader)?);
    }
    Ok((memory, start))
}

pub fn write_image_file<P: AsRef<Path>>(path: P, memory: &[Word], start: Option<u16>) -> io::Result<()> {
    write_image(&mut BufWriter::new(File::create(path)?), memory, start)
}

pub fn read_image_file<P: AsRef<Path>>(path: P, with_start: bool) -> io::Result<(Vec<Word>, Option<u16>)> {
    read_image(&mut BufReader::new(File::open(path)?), with_start)
}
