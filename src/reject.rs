use bit_vec::BitVec;

/// The reject table: one bit per ordered pair of sectors, set when nothing in the first sector
/// can possibly see anything in the second.  It's a conservative precomputation, so a clear bit
/// means "maybe", never "yes".
pub struct Reject {
    numsectors: usize,
    bits: BitVec,
}

impl Reject {
    pub fn all_visible(numsectors: usize) -> Reject {
        Reject {
            numsectors,
            bits: BitVec::from_elem(numsectors * numsectors, false),
        }
    }

    /// Read the REJECT lump format: row-major, least significant bit first.  A short lump is
    /// padded out as visible, which is how most ports treat the common truncated tables.
    pub fn from_lump(data: &[u8], numsectors: usize) -> Reject {
        let needed = numsectors * numsectors;
        if data.len() * 8 < needed {
            warn!("REJECT lump is {} bytes, expected {}; padding with zeroes", data.len(), (needed + 7) / 8);
        }
        let bits = BitVec::from_fn(needed, |pnum| {
            data.get(pnum >> 3).map_or(false, |byte| byte & (1 << (pnum & 7)) != 0)
        });
        Reject { numsectors, bits }
    }

    pub fn numsectors(&self) -> usize {
        self.numsectors
    }

    pub fn is_rejected(&self, s1: usize, s2: usize) -> bool {
        if s1 >= self.numsectors || s2 >= self.numsectors {
            return false;
        }
        self.bits.get(s1 * self.numsectors + s2).unwrap_or(false)
    }

    pub fn set_rejected(&mut self, s1: usize, s2: usize, rejected: bool) {
        if s1 < self.numsectors && s2 < self.numsectors {
            self.bits.set(s1 * self.numsectors + s2, rejected);
        }
    }
}
