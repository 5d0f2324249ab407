//! The static-mode frequency header: a run of `(symbol, count)` records
//! terminated by a zero count, written once before the coded payload.

use std::io::{self, Read, Write};

use super::bitstream::{BitReader, BitWriter};
use super::model::CumulativeTable;
use super::{CoderError, PRECISION};

const COUNT_BITS: u32 = PRECISION - 2;

pub(crate) fn write_header<W: Write>(table: &CumulativeTable, out: &mut BitWriter<W>) -> io::Result<()> {
    for sym in 0u16..256 {
        let count = table.count_of(sym as usize);
        if count > 0 {
            out.put_char(sym as u8)?;
            out.put_bits_msb_first(count, COUNT_BITS)?;
        }
    }
    out.put_char(0)?;
    out.put_bits_msb_first(0, COUNT_BITS)?;
    Ok(())
}

pub(crate) fn read_header<R: Read>(inp: &mut BitReader<R>) -> Result<CumulativeTable, CoderError> {
    let mut counts = [0u32; 256];
    let mut seen = [false; 256];
    loop {
        let sym = inp.get_char()?.unwrap_or(0);
        let count = inp.get_bits_msb_first(COUNT_BITS)?;
        if count == 0 {
            break;
        }
        if seen[sym as usize] {
            return Err(CoderError::MalformedHeader(sym));
        }
        seen[sym as usize] = true;
        counts[sym as usize] = count;
    }
    Ok(CumulativeTable::from_header_counts(&counts))
}
