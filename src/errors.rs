use std::io;

use nom;

error_chain! {
    foreign_links {
        Io(io::Error);
    }

    errors {
        ParseError {
            description("nonspecific parse error")
            display("nonspecific parse error")
        }
        TruncatedData(whence: &'static str) {
            description("unexpected end of input")
            display("unexpected end of input while parsing {}", whence)
        }
        InvalidMagic {
            description("invalid magic")
            display("invalid magic")
        }
        MissingMapLump(lump: &'static str) {
            description("missing required map lump")
            display("missing required map lump: {}", lump)
        }
        NegativeOffset(lump: &'static str, index: usize, value: isize) {
            description("nonsensical negative offset")
            display("found nonsensical negative offset {} in position {} while reading {}", value, index, lump)
        }
        BadReference(what: &'static str, index: usize) {
            description("reference to something that doesn't exist")
            display("reference to nonexistent {} #{}", what, index)
        }
        InvalidConfig(detail: String) {
            description("invalid configuration")
            display("invalid configuration: {}", detail)
        }
    }
}

/// Turn a nom result into one of ours.  `whence` names the thing being parsed, since nom has no
/// idea.
pub fn nom_to_result<I, O>(whence: &'static str, _input: I, result: nom::IResult<I, O>) -> Result<O> {
    match result {
        Ok((_leftovers, output)) => Ok(output),
        Err(nom::Err::Incomplete(_)) => Err(ErrorKind::TruncatedData(whence).into()),
        // TODO would be nice to say where in the input the error happened
        Err(nom::Err::Error(_)) | Err(nom::Err::Failure(_)) => Err(ErrorKind::ParseError.into()),
    }
}
