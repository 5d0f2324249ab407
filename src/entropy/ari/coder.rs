//! The interval coder: the `[lower, upper]` register pair each side narrows
//! per symbol, and the E1/E2/E3 bit renormalization that keeps that pair
//! from losing precision as the interval shrinks.

use std::io::{self, Read, Write};

use super::bitstream::{BitReader, BitWriter};
use super::{MSB, MSB_CLEAR, SMSB, TOP};

fn narrow(lower: u32, upper: u32, lo: u32, hi: u32, cum_total: u32) -> (u32, u32) {
    let width = (upper - lower + 1) as u64;
    let cum = cum_total as u64;
    let new_upper = lower + ((width * hi as u64) / cum) as u32 - 1;
    let new_lower = lower + ((width * lo as u64) / cum) as u32;
    (new_lower, new_upper)
}

/// Encoder-side interval state: `lower`/`upper` bracket the current coding
/// interval, `underflow` counts E3 bits deferred since the last emitted bit.
pub(crate) struct EncodeState {
    lower: u32,
    upper: u32,
    underflow: u32,
}

impl EncodeState {
    pub(crate) fn new() -> Self {
        EncodeState { lower: 0, upper: TOP, underflow: 0 }
    }

    pub(crate) fn encode_symbol<W: Write>(
        &mut self,
        lo: u32,
        hi: u32,
        cum_total: u32,
        out: &mut BitWriter<W>,
    ) -> io::Result<()> {
        let (lower, upper) = narrow(self.lower, self.upper, lo, hi, cum_total);
        self.lower = lower;
        self.upper = upper;
        self.renormalize(out)
    }

    fn renormalize<W: Write>(&mut self, out: &mut BitWriter<W>) -> io::Result<()> {
        loop {
            if (self.upper ^ !self.lower) & MSB != 0 {
                // E1/E2: the top bits of lower and upper agree. Emit it,
                // along with the complement of every bit deferred by E3
                // since the last emission.
                let bit = self.upper & MSB != 0;
                out.put_bit(bit)?;
                while self.underflow > 0 {
                    out.put_bit(!bit)?;
                    self.underflow -= 1;
                }
            } else if !self.upper & self.lower & SMSB != 0 {
                // E3: the interval straddles the midpoint without agreeing
                // on a top bit. Defer the decision and strip the ambiguous
                // second bit from both ends.
                self.underflow += 1;
                self.lower &= !(MSB | SMSB);
                self.upper |= SMSB;
            } else {
                break;
            }
            self.lower = (self.lower & MSB_CLEAR) << 1;
            self.upper = ((self.upper & MSB_CLEAR) << 1) | 1;
        }
        Ok(())
    }

    /// Flushes the two bits needed to disambiguate the final interval, plus
    /// any bits still deferred by E3.
    pub(crate) fn flush<W: Write>(&mut self, out: &mut BitWriter<W>) -> io::Result<()> {
        let bit = self.lower & SMSB != 0;
        out.put_bit(bit)?;
        for _ in 0..=self.underflow {
            out.put_bit(!bit)?;
        }
        Ok(())
    }
}

/// Decoder-side interval state, mirroring `EncodeState` plus the `code`
/// register holding the bits read from the stream so far.
pub(crate) struct DecodeState {
    lower: u32,
    upper: u32,
    code: u32,
}

impl DecodeState {
    pub(crate) fn new<R: Read>(inp: &mut BitReader<R>) -> io::Result<Self> {
        let mut code = 0u32;
        for _ in 0..super::PRECISION {
            let bit = inp.get_bit()?.unwrap_or(false);
            code = (code << 1) | bit as u32;
        }
        Ok(DecodeState { lower: 0, upper: TOP, code })
    }

    /// The unscaled cumulative-probability target the next symbol lookup
    /// must land in.
    pub(crate) fn target(&self, cum_total: u32) -> u32 {
        let width = (self.upper - self.lower + 1) as u64;
        let unscaled = (self.code - self.lower + 1) as u64 * cum_total as u64 - 1;
        (unscaled / width) as u32
    }

    pub(crate) fn decode_symbol<R: Read>(
        &mut self,
        lo: u32,
        hi: u32,
        cum_total: u32,
        inp: &mut BitReader<R>,
    ) -> io::Result<()> {
        let (lower, upper) = narrow(self.lower, self.upper, lo, hi, cum_total);
        self.lower = lower;
        self.upper = upper;
        self.renormalize(inp)
    }

    fn renormalize<R: Read>(&mut self, inp: &mut BitReader<R>) -> io::Result<()> {
        loop {
            if (self.upper ^ !self.lower) & MSB != 0 {
                // matching E1/E2 on the decode side: nothing to undo, the
                // agreeing bit has already been consumed into `code`.
            } else if !self.upper & self.lower & SMSB != 0 {
                self.lower &= !(MSB | SMSB);
                self.upper |= SMSB;
                self.code ^= SMSB;
            } else {
                break;
            }
            self.lower = (self.lower & MSB_CLEAR) << 1;
            self.upper = ((self.upper & MSB_CLEAR) << 1) | 1;
            let bit = inp.get_bit()?.unwrap_or(false);
            self.code = ((self.code & MSB_CLEAR) << 1) | bit as u32;
        }
        Ok(())
    }
}
