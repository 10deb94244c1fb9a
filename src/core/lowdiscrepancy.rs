//! Low discrepancy sequences used for subpixel jitter, lens and time
//! sampling and photon emission. All functions are pure; the Faure
//! scrambling tables are built once on first use and shared
//! read-only afterwards.

// others
use lazy_static::lazy_static;

/// Number of prime bases with a scrambling permutation.
pub const NUM_PRIMES: usize = 128;

/// First primes and their Faure digit permutations.
pub struct FaureTables {
    pub primes: Vec<u32>,
    pub sigma: Vec<Vec<u32>>,
}

lazy_static! {
    static ref FAURE: FaureTables = FaureTables::build(NUM_PRIMES);
}

impl FaureTables {
    fn build(num: usize) -> FaureTables {
        log::debug!("initializing Faure scrambling tables ...");
        let mut primes: Vec<u32> = Vec::with_capacity(num);
        primes.push(2);
        while primes.len() < num {
            let last: u32 = primes[primes.len() - 1];
            primes.push(next_prime(last));
        }
        let largest: usize = primes[num - 1] as usize;
        // table[b] is the permutation for base b, built from smaller bases
        let mut table: Vec<Vec<u32>> = vec![Vec::new(); largest + 1];
        table[2] = vec![0, 1];
        for b in 3..=largest {
            let mut perm: Vec<u32> = vec![0; b];
            if b & 1 == 0 {
                let prev: &Vec<u32> = &table[b >> 1];
                let half: usize = prev.len();
                for j in 0..half {
                    perm[j] = 2 * prev[j];
                    perm[half + j] = 2 * prev[j] + 1;
                }
            } else {
                let prev: &Vec<u32> = &table[b - 1];
                let med: usize = (b - 1) >> 1;
                let bump = |v: u32| if v as usize >= med { v + 1 } else { v };
                for j in 0..med {
                    perm[j] = bump(prev[j]);
                    perm[med + j + 1] = bump(prev[j + med]);
                }
                perm[med] = med as u32;
            }
            table[b] = perm;
        }
        let sigma: Vec<Vec<u32>> = primes.iter().map(|p| table[*p as usize].clone()).collect();
        FaureTables { primes, sigma }
    }
}

fn next_prime(p: u32) -> u32 {
    let mut p: u32 = p + (p & 1) + 1;
    loop {
        let mut div: u32 = 3;
        let mut is_prime: bool = true;
        while is_prime && div * div <= p {
            is_prime = p % div != 0;
            div += 2;
        }
        if is_prime {
            return p;
        }
        p += 2;
    }
}

/// The bits of an integer quantity can be efficiently reversed with a
/// series of logical bit operations.
pub fn reverse_bits_32(n: u32) -> u32 {
    let mut n = (n << 16) | (n >> 16);
    n = ((n & 0x00ff_00ff) << 8) | ((n & 0xff00_ff00) >> 8);
    n = ((n & 0x0f0f_0f0f) << 4) | ((n & 0xf0f0_f0f0) >> 4);
    n = ((n & 0x3333_3333) << 2) | ((n & 0xcccc_cccc) >> 2);
    n = ((n & 0x5555_5555) << 1) | ((n & 0xaaaa_aaaa) >> 1);
    n
}

/// Van der Corput sequence: bit reversal of *i* as a fraction.
pub fn radical_inverse_base2(i: u32) -> f64 {
    reverse_bits_32(i) as f64 / 4_294_967_296.0_f64
}

pub fn radical_inverse_base3(i: u32) -> f64 {
    let inv: f64 = 1.0 / 3.0;
    let mut v: f64 = 0.0;
    let mut p: f64 = inv;
    let mut n: u32 = i;
    while n != 0 {
        v += (n % 3) as f64 * p;
        p *= inv;
        n /= 3;
    }
    v
}

/// Radical inverse in the *d*-th prime base with Faure scrambled
/// digits. Dimensions past the table wrap around.
pub fn halton_scrambled(d: usize, i: u32) -> f64 {
    let tables: &FaureTables = &FAURE;
    let k: usize = d % tables.primes.len();
    let base: u32 = tables.primes[k];
    let perm: &[u32] = &tables.sigma[k];
    let inv: f64 = 1.0 / base as f64;
    let mut v: f64 = 0.0;
    let mut p: f64 = inv;
    let mut n: u32 = i;
    while n != 0 {
        v += perm[(n % base) as usize] as f64 * p;
        p *= inv;
        n /= base;
    }
    v
}

/// Generalized Halton sequence: base 2 and 3 for the first two
/// dimensions, scrambled prime bases after that.
pub fn halton(d: usize, i: u32) -> f64 {
    match d {
        0 => radical_inverse_base2(i),
        1 => radical_inverse_base3(i),
        _ => halton_scrambled(d, i),
    }
}

/// Fractional part, *x* must not be negative.
pub fn mod1(x: f64) -> f64 {
    debug_assert!(x >= 0.0);
    x - x.trunc()
}

/// Bit-reversal permutation of *0..n* used to decorrelate jitter
/// offsets of neighboring subpixels. Panics unless *n* is a power of
/// two.
pub fn generate_sigma_table(n: usize) -> Vec<u32> {
    assert!(n.is_power_of_two(), "sigma table size {} is not a power of two", n);
    let mut sigma: Vec<u32> = vec![0; n];
    for (i, s) in sigma.iter_mut().enumerate() {
        let mut digit: usize = n;
        let mut bits: usize = i;
        while bits != 0 {
            digit >>= 1;
            if bits & 1 != 0 {
                *s += digit as u32;
            }
            bits >>= 1;
        }
    }
    sigma
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_primes() {
        let tables: &FaureTables = &FAURE;
        assert_eq!(tables.primes.len(), NUM_PRIMES);
        assert_eq!(&tables.primes[..8], &[2, 3, 5, 7, 11, 13, 17, 19]);
        assert_eq!(tables.primes[NUM_PRIMES - 1], 719);
    }

    #[test]
    fn faure_tables_are_permutations() {
        let tables: &FaureTables = &FAURE;
        for (p, perm) in tables.primes.iter().zip(tables.sigma.iter()) {
            let mut sorted: Vec<u32> = perm.clone();
            sorted.sort_unstable();
            let expected: Vec<u32> = (0..*p).collect();
            assert_eq!(sorted, expected);
        }
        assert_eq!(tables.sigma[1], vec![0, 1, 2]);
        assert_eq!(tables.sigma[2], vec![0, 3, 2, 1, 4]);
    }

    #[test]
    fn base2_and_base3() {
        assert_eq!(radical_inverse_base2(0), 0.0);
        assert_eq!(radical_inverse_base2(1), 0.5);
        assert_eq!(radical_inverse_base2(2), 0.25);
        assert_eq!(radical_inverse_base2(3), 0.75);
        assert!((radical_inverse_base3(1) - 1.0 / 3.0).abs() < 1e-12);
        assert!((radical_inverse_base3(5) - (2.0 / 3.0 + 1.0 / 9.0)).abs() < 1e-12);
    }

    #[test]
    fn scrambled_halton_is_deterministic_and_in_range() {
        for d in 2..129 {
            for i in (0..100_000_u32).step_by(7) {
                let a = halton(d, i);
                assert!(a >= 0.0 && a < 1.0, "halton({}, {}) = {}", d, i, a);
                assert_eq!(a, halton(d, i));
            }
        }
    }

    #[test]
    fn sigma_table_is_bit_reversal() {
        assert_eq!(generate_sigma_table(8), vec![0, 4, 2, 6, 1, 5, 3, 7]);
        assert_eq!(generate_sigma_table(1), vec![0]);
    }

    #[test]
    #[should_panic]
    fn sigma_table_rejects_non_power_of_two() {
        generate_sigma_table(12);
    }

    #[test]
    fn fractional_part() {
        assert_eq!(mod1(2.25), 0.25);
        assert_eq!(mod1(0.5), 0.5);
    }
}
