use ga_core::charset::{Alphabet, symbol_index};

/// Plus grande somme de canaux : 3 × 255.
pub const MAX_CHANNEL_SUM: usize = 765;

/// Lookup table mapping the channel sum `r + g + b` → symbol.
///
/// The luminance is `sum / 3`, so indexing by the sum is exact and the
/// per-pixel cost is one array read.
///
/// # Example
/// ```
/// use ga_ascii::lut::SymbolLut;
/// use ga_core::charset::Alphabet;
/// let lut = SymbolLut::new(Alphabet::from_chars(" .:#@").unwrap());
/// assert_eq!(lut.map_sum(0), " ");
/// assert_eq!(lut.map_sum(765), "@");
/// ```
#[derive(Clone, Debug)]
pub struct SymbolLut {
    alphabet: Alphabet,
    lut: Box<[usize; MAX_CHANNEL_SUM + 1]>,
}

impl SymbolLut {
    /// Build a LUT from an alphabet ordered darkest→brightest.
    #[must_use]
    pub fn new(alphabet: Alphabet) -> Self {
        let len = alphabet.len();
        let mut lut = Box::new([0usize; MAX_CHANNEL_SUM + 1]);
        for (sum, slot) in lut.iter_mut().enumerate() {
            *slot = symbol_index(sum as f64 / 3.0, len);
        }
        Self { alphabet, lut }
    }

    #[must_use]
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Symbol index for a channel sum in [0, 765].
    #[inline(always)]
    #[must_use]
    pub fn index(&self, sum: u16) -> usize {
        self.lut[usize::from(sum).min(MAX_CHANNEL_SUM)]
    }

    /// Symbol for a channel sum in [0, 765].
    #[inline(always)]
    #[must_use]
    pub fn map_sum(&self, sum: u16) -> &str {
        self.alphabet.get(self.index(sum))
    }
}
