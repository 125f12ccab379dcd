#![forbid(unsafe_code)]

/// Per-row null flags for a container (`true` = null).
///
/// Bits are stored little-endian within each `u64` word, and bits past `len` are always zero so
/// that derived `PartialEq` compares logical content.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NullMask {
    words: Vec<u64>,
    len: usize,
    nulls: usize,
}

impl NullMask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(rows: usize) -> Self {
        Self {
            words: Vec::with_capacity(rows.div_ceil(64)),
            len: 0,
            nulls: 0,
        }
    }

    /// A mask of `rows` entries with no nulls.
    pub fn all_valid(rows: usize) -> Self {
        Self {
            words: vec![0u64; rows.div_ceil(64)],
            len: rows,
            nulls: 0,
        }
    }

    /// A mask of `rows` entries that are all null.
    pub fn all_null(rows: usize) -> Self {
        if rows == 0 {
            return Self::new();
        }

        let mut words = vec![u64::MAX; rows.div_ceil(64)];
        let rem = rows % 64;
        if rem != 0 {
            if let Some(last) = words.last_mut() {
                *last = (1u64 << rem) - 1;
            }
        }

        Self {
            words,
            len: rows,
            nulls: rows,
        }
    }

    pub fn from_bools(flags: &[bool]) -> Self {
        flags.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn push(&mut self, is_null: bool) {
        let bit = self.len % 64;
        if bit == 0 {
            self.words.push(0);
        }

        if is_null {
            self.words[self.len / 64] |= 1u64 << bit;
            self.nulls += 1;
        }

        self.len += 1;
    }

    /// Whether `row` is null. Rows past the end read as null.
    pub fn get(&self, row: usize) -> bool {
        if row >= self.len {
            return true;
        }
        (self.words[row / 64] >> (row % 64)) & 1 == 1
    }

    /// Set the flag for `row`. Rows past the end are ignored.
    pub fn set(&mut self, row: usize, is_null: bool) {
        if row >= self.len {
            return;
        }
        let word = &mut self.words[row / 64];
        let mask = 1u64 << (row % 64);
        let was_null = (*word & mask) != 0;

        match (was_null, is_null) {
            (true, false) => {
                *word &= !mask;
                self.nulls -= 1;
            }
            (false, true) => {
                *word |= mask;
                self.nulls += 1;
            }
            _ => {}
        }
    }

    pub fn null_count(&self) -> usize {
        self.nulls
    }

    pub fn valid_count(&self) -> usize {
        self.len - self.nulls
    }

    pub fn any_null(&self) -> bool {
        self.nulls > 0
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(|row| self.get(row))
    }

    pub fn to_bools(&self) -> Vec<bool> {
        self.iter().collect()
    }

    /// Gather the flags at `positions` into a new mask.
    pub fn take(&self, positions: &[usize]) -> Self {
        positions.iter().map(|&row| self.get(row)).collect()
    }

    /// Mark every row null that is null in `other`.
    pub fn union_inplace(&mut self, other: &NullMask) {
        debug_assert_eq!(self.len, other.len, "NullMask length mismatch");
        let mut nulls = 0usize;
        for (w, o) in self.words.iter_mut().zip(other.words.iter()) {
            *w |= *o;
            nulls += w.count_ones() as usize;
        }
        self.nulls = nulls;
    }
}

impl FromIterator<bool> for NullMask {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut mask = NullMask::with_capacity(iter.size_hint().0);
        for flag in iter {
            mask.push(flag);
        }
        mask
    }
}
