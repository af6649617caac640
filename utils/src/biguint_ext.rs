use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{Euclid, One};
use std::borrow::Borrow;
use std::ops::Deref;

pub struct BigUintExt<T: Borrow<BigUint>>(pub T);

impl<T: Borrow<BigUint>> Deref for BigUintExt<T> {
    type Target = BigUint;
    fn deref(&self) -> &Self::Target {
        self.0.borrow()
    }
}

impl<T: Borrow<BigUint>> BigUintExt<T> {
    /// 字节长度`k`满足: $2^{8(k-1)} \le n \lt 2^{8k}$
    pub fn byte_len(&self) -> usize {
        (self.bits() as usize + 7) >> 3
    }

    pub fn is_odd_number(&self) -> bool {
        self.bit(0)
    }

    /// self * inv = 1 \mod modulus
    ///
    /// 由扩展欧几里得算法得$d = ax' + ny'$, 当且仅当$d = 1$时逆元存在.
    pub fn modinv(&self, modulus: &BigUint) -> Option<BigUint> {
        let (a, n) = (BigInt::from(self.deref() % modulus), BigInt::from(modulus.clone()));
        let g = a.extended_gcd(&n);
        if g.gcd.is_one() {
            g.x.rem_euclid(&n).to_biguint()
        } else {
            None
        }
    }
}
