use nom::{self, IResult, Needed, le_u32};

use super::util::fixed_length_ascii;
use errors::{Result, nom_to_result};
use archive::wad::{BareWAD, BareWADHeader, BareWADDirectoryEntry, WADType};

const DIRECTORY_ENTRY_SIZE: usize = 16;

named!(iwad_tag<WADType>, value!(WADType::IWAD, tag!(b"IWAD")));
named!(pwad_tag<WADType>, value!(WADType::PWAD, tag!(b"PWAD")));

named!(wad_header<BareWADHeader>, do_parse!(
    identification: return_error!(
        nom::ErrorKind::Custom(1),
        alt!(iwad_tag | pwad_tag)) >>
    numlumps: le_u32 >>
    infotableofs: le_u32 >>
    (BareWADHeader{ identification, numlumps, infotableofs })
));

named!(wad_entry<BareWADDirectoryEntry>, do_parse!(
    filepos: le_u32 >>
    size: le_u32 >>
    name: apply!(fixed_length_ascii, 8) >>
    (BareWADDirectoryEntry{ filepos, size, name })
));

fn wad_directory<'a>(buf: &'a [u8], header: &BareWADHeader) -> IResult<&'a [u8], Vec<BareWADDirectoryEntry<'a>>> {
    let lumpct = header.numlumps as usize;
    let offset = header.infotableofs as usize;
    let tablelen = lumpct * DIRECTORY_ENTRY_SIZE;
    if buf.len() < offset + tablelen {
        return Err(nom::Err::Incomplete(Needed::Size(tablelen)));
    }

    let mut ret = Vec::with_capacity(lumpct);
    let mut parse_from = &buf[offset..];
    for _ in 0..lumpct {
        let (leftovers, entry) = try_parse!(parse_from, wad_entry);
        ret.push(entry);
        parse_from = leftovers;
    }
    Ok((parse_from, ret))
}

/// Read a WAD's header and directory.  Lump contents aren't touched until something asks for
/// them.
pub fn parse_wad(buf: &[u8]) -> Result<BareWAD> {
    let header = nom_to_result("wad header", buf, wad_header(buf))?;
    let entries = nom_to_result("wad directory", buf, wad_directory(buf, &header))?;
    debug!("read {:?} with {} lumps", header.identification, entries.len());
    Ok(BareWAD{ buffer: buf, header, directory: entries })
}
