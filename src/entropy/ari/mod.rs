/*!

Arithmetic encoder/decoder over a 257-symbol alphabet (the 256 byte values
plus an end-of-stream sentinel), implemented as the classic CACM87-style
bit-level coder: a `[lower, upper]` interval narrowed once per symbol, with
E1/E2/E3 bit renormalization keeping the interval from losing precision as
it shrinks. Two probability models are supported: a static model built in a
first pass over the whole input and recorded in a header, and an adaptive
model that starts flat and updates itself as it codes.

# Links

http://en.wikipedia.org/wiki/Arithmetic_coding

# Credit

The interval arithmetic here follows Mark Nelson's/Dipperstein's
description of the CACM87 algorithm rather than the range-coder approach
used elsewhere in this crate.

*/

use std::io::{Read, Write};

mod bitstream;
mod coder;
mod header;
mod model;

use bitstream::{BitReader, BitWriter};
use model::CumulativeTable;

/// Number of bits of precision the `lower`/`upper`/`code` registers carry.
const PRECISION: u32 = 16;
const TOP: u32 = (1 << PRECISION) - 1;
const MSB: u32 = 1 << (PRECISION - 1);
const SMSB: u32 = 1 << (PRECISION - 2);
const MSB_CLEAR: u32 = MSB - 1;
/// Cumulative-total ceiling that triggers an adaptive-model rescale, or
/// bounds the counts a static model is built from.
const MAX_CUM: u32 = 1 << (PRECISION - 2);

/// Index of the end-of-stream sentinel within the 257-symbol alphabet.
const EOF: usize = 256;
/// Alphabet size, including EOF.
const NUM_SYMBOLS: usize = 257;
/// Length of the cumulative-bounds array, `R[0..=257]`.
const TABLE_LEN: usize = NUM_SYMBOLS + 1;

/// Selects which probability model an `Encoder`/`Decoder` pair uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Two-pass: tally the whole input first, record frequencies in a
    /// header, then code against the fixed table.
    Static,
    /// One-pass: start from a flat table and update it after every symbol.
    Adaptive,
}

/// Errors that can arise while encoding or decoding.
#[derive(Debug, thiserror::Error)]
pub enum CoderError {
    /// `encode`/`decode` was called on a coder instance that already
    /// completed (or is mid-) a pass. Call `reset` first.
    #[error("coder already bound to an in-progress pass")]
    AlreadyOpen,
    /// Reserved for entry points that require an input stream to already be
    /// bound before they run; the high-level `encode`/`decode` API always
    /// binds input and output together, so this crate never returns it.
    #[error("no input stream bound")]
    NoInput,
    /// Reserved for entry points that require an output stream to already
    /// be bound before they run; unreachable through this crate's
    /// high-level API for the same reason as `NoInput`.
    #[error("no output stream bound")]
    NoOutput,
    /// A static header named the same symbol twice.
    #[error("duplicate header entry for symbol {0:#04x}")]
    MalformedHeader(u8),
    /// A cumulative-probability target did not fall within any symbol's
    /// range; only possible when decoding a corrupted stream.
    #[error("probability target does not fall within any symbol range")]
    RangeLookup,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Compresses a byte stream into the arithmetic-coded format.
///
/// One `Encoder` performs one encoding pass; call `reset` to reuse it for
/// another.
pub struct Encoder {
    mode: Mode,
    bound: bool,
}

impl Encoder {
    pub fn new(mode: Mode) -> Self {
        Encoder { mode, bound: false }
    }

    /// Releases this encoder to run another pass.
    pub fn reset(&mut self) {
        self.bound = false;
    }

    /// Encodes `input` in full, writing the compressed form to `output` and
    /// returning it once finished.
    pub fn encode<W: Write>(&mut self, input: &[u8], output: W) -> Result<W, CoderError> {
        if self.bound {
            return Err(CoderError::AlreadyOpen);
        }
        self.bound = true;

        let mut table = match self.mode {
            Mode::Static => CumulativeTable::build_static(input),
            Mode::Adaptive => CumulativeTable::new_adaptive(),
        };

        let mut writer = BitWriter::new(output);
        if self.mode == Mode::Static {
            header::write_header(&table, &mut writer)?;
            log::info!("wrote static header, cumulative total {}", table.cum_total());
        }

        let mut state = coder::EncodeState::new();
        for &byte in input {
            let (lo, hi) = table.range_of(byte as usize);
            state.encode_symbol(lo, hi, table.cum_total(), &mut writer)?;
            if self.mode == Mode::Adaptive {
                table.update_adaptive(byte as usize);
            }
            log::trace!("encoded byte {byte:#04x}");
        }

        let (lo, hi) = table.range_of(EOF);
        state.encode_symbol(lo, hi, table.cum_total(), &mut writer)?;
        state.flush(&mut writer)?;
        log::info!("encoded {} input bytes", input.len());

        Ok(writer.finish()?)
    }
}

/// Decompresses an arithmetic-coded byte stream.
///
/// One `Decoder` performs one decoding pass; call `reset` to reuse it for
/// another.
pub struct Decoder {
    mode: Mode,
    bound: bool,
}

impl Decoder {
    pub fn new(mode: Mode) -> Self {
        Decoder { mode, bound: false }
    }

    pub fn reset(&mut self) {
        self.bound = false;
    }

    /// Decodes `input` in full, returning the recovered bytes.
    pub fn decode<R: Read>(&mut self, input: R) -> Result<Vec<u8>, CoderError> {
        if self.bound {
            return Err(CoderError::AlreadyOpen);
        }
        self.bound = true;

        let mut reader = BitReader::new(input);
        let mut table = match self.mode {
            Mode::Static => header::read_header(&mut reader)?,
            Mode::Adaptive => CumulativeTable::new_adaptive(),
        };
        log::info!("ready to decode, cumulative total {}", table.cum_total());

        let mut state = coder::DecodeState::new(&mut reader)?;
        let mut output = Vec::new();

        loop {
            let target = state.target(table.cum_total());
            let symbol = table.symbol_of(target)?;
            if symbol == EOF {
                break;
            }
            let (lo, hi) = table.range_of(symbol);
            state.decode_symbol(lo, hi, table.cum_total(), &mut reader)?;
            if self.mode == Mode::Adaptive {
                table.update_adaptive(symbol);
            }
            output.push(symbol as u8);
            log::trace!("decoded byte {symbol:#04x}");
        }

        log::info!("decoded {} output bytes", output.len());
        Ok(output)
    }
}
