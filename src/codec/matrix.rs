//! GF(2) matrices of the (10,6) code.
//!
//! The systematic generator `G` is obtained from a fixed non-systematic seed
//! by Gauss-Jordan elimination (row swaps and row XORs only) until the left
//! 6×6 block is the identity. `H` is then `[Pᵗ | I₄]` where `P` is the 6×4
//! parity block of `G` (columns 6..10).
//!
//! Reduced row echelon form is unique, so the derivation does not depend on
//! the order of the seed rows. All of it runs in `const` context: a seed
//! with a singular information block fails the build.

/// Data bits per word (k).
pub const K: usize = 6;

/// Codeword bits, overall parity excluded (n).
pub const N: usize = 10;

/// Parity bits inside the codeword (r = n - k).
pub const R: usize = N - K;

pub type GeneratorMatrix = [[u8; N]; K];
pub type ParityCheckMatrix = [[u8; N]; R];
pub type ParityCheckTranspose = [[u8; R]; N];

/// Non-systematic generator the printed cards were designed against.
pub const SEED_GENERATOR: GeneratorMatrix = [
    [1, 1, 1, 0, 0, 0, 0, 1, 0, 0],
    [0, 1, 0, 0, 1, 0, 0, 1, 0, 0],
    [1, 0, 0, 1, 0, 1, 0, 0, 0, 0],
    [0, 0, 0, 1, 0, 0, 1, 1, 0, 0],
    [1, 1, 0, 1, 0, 0, 0, 1, 1, 0],
    [1, 0, 0, 1, 0, 0, 0, 1, 0, 1],
];

pub const GENERATOR: GeneratorMatrix = match systematic_form(&SEED_GENERATOR) {
    Some(g) => g,
    None => panic!("seed generator matrix has a singular information block"),
};

pub const PARITY_CHECK: ParityCheckMatrix = parity_check(&GENERATOR);

/// Row `i` is the syndrome produced by a single error at codeword bit `i`.
pub const PARITY_CHECK_T: ParityCheckTranspose = transpose(&PARITY_CHECK);

/// Reduces `seed` so that its left `K`×`K` block is the identity.
///
/// Returns `None` if that block is singular.
pub const fn systematic_form(seed: &GeneratorMatrix) -> Option<GeneratorMatrix> {
    let mut m = *seed;
    let mut col = 0;

    while col < K {
        let mut pivot = col;
        while pivot < K && m[pivot][col] == 0 {
            pivot += 1;
        }
        if pivot == K {
            return None;
        }

        if pivot != col {
            let row = m[pivot];
            m[pivot] = m[col];
            m[col] = row;
        }

        let mut row = 0;
        while row < K {
            if row != col && m[row][col] == 1 {
                let mut j = 0;
                while j < N {
                    m[row][j] ^= m[col][j];
                    j += 1;
                }
            }
            row += 1;
        }

        col += 1;
    }

    Some(m)
}

/// `H = [Pᵗ | I]` for a systematic `G = [I | P]`.
pub const fn parity_check(g: &GeneratorMatrix) -> ParityCheckMatrix {
    let mut h = [[0u8; N]; R];
    let mut i = 0;

    while i < R {
        let mut j = 0;
        while j < K {
            h[i][j] = g[j][K + i];
            j += 1;
        }
        h[i][K + i] = 1;
        i += 1;
    }

    h
}

pub const fn transpose<const ROWS: usize, const COLS: usize>(
    m: &[[u8; COLS]; ROWS],
) -> [[u8; ROWS]; COLS] {
    let mut t = [[0u8; ROWS]; COLS];
    let mut i = 0;

    while i < ROWS {
        let mut j = 0;
        while j < COLS {
            t[j][i] = m[i][j];
            j += 1;
        }
        i += 1;
    }

    t
}

/// Row vector times matrix over GF(2).
pub fn multiply<const ROWS: usize, const COLS: usize>(
    v: &[u8; ROWS],
    m: &[[u8; COLS]; ROWS],
) -> [u8; COLS] {
    let mut out = [0u8; COLS];
    for (bit, row) in v.iter().zip(m.iter()) {
        if *bit == 1 {
            for (acc, entry) in out.iter_mut().zip(row.iter()) {
                *acc ^= entry;
            }
        }
    }
    out
}
