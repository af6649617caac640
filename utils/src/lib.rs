mod biguint_ext;
pub use biguint_ext::BigUintExt;

mod primes;
pub use primes::{SmallPrimes, Stripped};
