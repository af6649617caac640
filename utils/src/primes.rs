use num_bigint::BigUint;
use num_traits::{One, Zero};

/// 小素数表, 包含所有小于`bound`的素数
#[derive(Clone, Debug)]
pub struct SmallPrimes {
    bound: u32,
    primes: Vec<u32>,
}

/// Result of stripping small prime factors from a number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stripped {
    /// what is left after every small prime has been divided out
    pub value: BigUint,
    /// (prime, multiplicity)
    pub removed: Vec<(u32, u32)>,
}

impl SmallPrimes {
    /// Sieve of Eratosthenes over `[2, bound)`.
    pub fn new(bound: u32) -> Self {
        let len = bound as usize;
        let mut composite = vec![false; len];
        let mut primes = Vec::new();

        for i in 2..len {
            if composite[i] {
                continue;
            }

            primes.push(i as u32);
            let mut j = i * i;
            while j < len {
                composite[j] = true;
                j += i;
            }
        }

        Self { bound, primes }
    }

    pub fn bound(&self) -> u32 {
        self.bound
    }

    pub fn len(&self) -> usize {
        self.primes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, u32> {
        self.primes.iter()
    }

    /// Divide out every prime below the bound, as many times as it divides `n`.
    pub fn strip(&self, mut n: BigUint) -> Stripped {
        let mut removed = Vec::new();
        if n.is_zero() {
            return Stripped { value: n, removed };
        }

        for &p in self.primes.iter() {
            if n.is_one() {
                break;
            }

            let mut k = 0u32;
            while (&n % p).is_zero() {
                n /= p;
                k += 1;
            }

            if k > 0 {
                removed.push((p, k));
            }
        }

        Stripped { value: n, removed }
    }
}

#[cfg(test)]
mod tests {
    use crate::SmallPrimes;
    use num_bigint::BigUint;
    use num_traits::Num;

    #[test]
    fn sieve() {
        // (bound, count, last prime)
        let cases = [(2, 0, None), (3, 1, Some(2)), (100, 25, Some(97)), (100000, 9592, Some(99991))];

        for (i, (bound, count, last)) in cases.into_iter().enumerate() {
            let primes = SmallPrimes::new(bound);
            assert_eq!(primes.len(), count, "case {i} count not match");
            assert_eq!(primes.iter().last().copied(), last, "case {i} last prime not match");
        }
    }

    #[test]
    fn strip_cofactor() {
        let n = BigUint::from_str_radix("290684273230919398108010081414538931343", 10).unwrap();
        let primes = SmallPrimes::new(100000);

        let g = &n * BigUint::from(8u32 * 3 * 99991);
        let stripped = primes.strip(g);
        assert_eq!(stripped.value, n);
        assert_eq!(stripped.removed, vec![(2, 3), (3, 1), (99991, 1)]);

        // 100003 is the first prime above the bound
        let g = &n * BigUint::from(100003u32);
        let stripped = primes.strip(g.clone());
        assert_eq!(stripped.value, g);
        assert!(stripped.removed.is_empty());
    }

    #[test]
    fn strip_degenerate() {
        let primes = SmallPrimes::new(100);
        assert_eq!(primes.strip(BigUint::from(0u8)).value, BigUint::from(0u8));
        assert_eq!(primes.strip(BigUint::from(64u8)).value, BigUint::from(1u8));
    }
}
