//! Fixed key material for the tests, every prime p satisfies gcd(p - 1, e) = 1 for e in {3, 17, 65537}.

use crate::{HashAlgorithm, PaddedHashBuilder, SignatureRecord, SignerId};
use num_bigint::BigUint;
use num_traits::Num;
use utils::BigUintExt;

pub(crate) struct TestPrimes {
    p: &'static str,
    q: &'static str,
}

pub(crate) struct TestKey {
    n: BigUint,
    d: BigUint,
}

pub(crate) const KEY_2048: TestPrimes = TestPrimes {
    p: "c83a177683146747b8280b5853a554a0359efd57fbee704a38fab4e67ffe02d0f7c84c937fc51cf4d33704134a7beb5a0502437d8d5b3f7cca34caeb8141dfb642563f431bb8f4c15f6b72b4a404e12c9dd775a4308ee55f02c6b5d338aaa06cd2d8678304a1749e5c5a26696801a79bfb30f7d1dfb3328c2de6a3e477b0b597",
    q: "dd9cec7afb9359f65bbcea440d013674f18a317b0b5f28d3e4b262275c618bae4fd5bae216cf43485babd6ec9c228516e30490768cf9ddcdba91431fb825a89d9e245bc251f2618568378b873899667fe6427957c920c915be9a2e012e5b4a0e4f18b17bd30f9add00637772a41a237371c9d6ac18f500d1cf3e0fd0b49b1a41",
};

// wider than the default candidate lengths
pub(crate) const KEY_4608: TestPrimes = TestPrimes {
    p: "d774a8c36cb780ad57d288691217b8ac833eb1aae18ed769c41879075b12ac584e9a908c8e29442476defc8165eb20b2e86de8653bab1671d05aa15fbf5785a3fab411dd1d02e087037a1ca84b1aa12837cf8958d3337a0204d9ad28fa048b1e992c3518419a33a717283381fcc8cbd7006171c909c8c258bd3261cfbc627b08afee52a9b16c7b56d1f9b1226b29993b412140ab49f476a2cc19460ad718203d8dea4191dcc4d6284e57c62e2261efdf2e2dc995a8d16e8faed150cad2eb849248471ddd17e7ab042d5752fc5125913660d0a40a63a9e1206631c7dc50d516312e4bd74bc40a5ea005749047fe84bbdcde480851acf3e81aaef505c6f5e2802969948643a7002afe05727ea4bb27a70a4b80185aa0b0da640ce7d5cb07477ad9",
    q: "c3454d3764777751a84f66248484e117bf6ce6cf6b74f67cca4c246fc696fa43b705b093fe50886a3717ea7bd0fbb974fe6a2256972d205eafd51aa467fea160c7b1a83cfb72fe4adfbd53d8e174297d142bac77f96ad922a3b8f91b791e3c7aed531b828df7fbee8589026c5c5176f8ad80227fa0c322405f13d1640bb393f28cdf0094c1b44d739ab6fc851c23627e177f915d945780d7c621f916e3071bcd591555a6f5ba8ec31f2f075aab49907e758fc1c821f3a76f5748e296ed02afb50ee9f68c80a7dff4517c9c8938a029a2c46b636f8c1adbff63c9dee675e6305892f4619830cb64643954d2aed43dbec60472dc6c7de86f36f217c9e45bb592b295d3f7324839e45e52bd04a9423108061d4651db1ad8c467b51fe1b0fd3583cb",
};

pub(crate) const KEY_1024_A: TestPrimes = TestPrimes {
    p: "f66226b26abf592e57c1f61347886ac910f030357756a37fbf10b239dd62bc3d817fe77a4a138f250e2059a375b6da8b396110385fe925b50ab8d2774bc8d893",
    q: "d28760ef9506638db175fe91be734122e49bec562b042161d1857d02f52435b58d7eaeea5569ec0810d555f2753d1d8b74c7d32222b2f1e9cfcafd579dba66b7",
};

pub(crate) const KEY_1024_B: TestPrimes = TestPrimes {
    p: "f4954f6624364119efd339bb654db1386ef85f3cbbf4d9b32bedef32acf60cd11cecc1cae4f1181146f9003364e78d69b4e95b86ddb5cc1534b6b13eaf6d15eb",
    q: "d7d6fe118649c7be8eae01fc4cc022e289f46e4f4313b009b90227a3ae39f4e52ef9e5c0249d13ec9e52b157475b314d0e02f5d2523ca42fcb540e2a09672043",
};

pub(crate) const MESSAGES: [&[u8]; 4] = [
    b"from:Alice <alice@example.org>\r\nsubject:first report\r\ndkim-signature:v=1; a=rsa-sha256; d=example.org; s=s1; b=",
    b"from:Alice <alice@example.org>\r\nsubject:second report\r\ndkim-signature:v=1; a=rsa-sha256; d=example.org; s=s1; b=",
    b"from:Bob <bob@example.org>\r\nsubject:re: first report\r\n",
    b"to:carol@example.net\r\nsubject:weekly digest\r\n",
];

impl TestPrimes {
    pub(crate) fn private_key(&self, e: u32) -> TestKey {
        let (p, q) = (
            BigUint::from_str_radix(self.p, 16).unwrap(),
            BigUint::from_str_radix(self.q, 16).unwrap(),
        );
        let totient = (&p - 1u32) * (&q - 1u32);
        let d = BigUintExt(BigUint::from(e)).modinv(&totient).unwrap();

        TestKey { n: p * q, d }
    }
}

impl TestKey {
    pub(crate) fn modulus(&self) -> &BigUint {
        &self.n
    }

    /// RSASSA-PKCS1-v1_5 signature, encoded on the full modulus byte length
    pub(crate) fn sign_bytes(&self, msg: &[u8], hash: HashAlgorithm) -> Vec<u8> {
        let klen = BigUintExt(&self.n).byte_len();
        let em = PaddedHashBuilder::build(msg, hash, klen).unwrap();
        let s = em.modpow(&self.d, &self.n).to_bytes_be();

        let mut sig = vec![0u8; klen - s.len()];
        sig.extend_from_slice(s.as_slice());
        sig
    }

    pub(crate) fn sign(
        &self,
        msg: &[u8],
        hash: HashAlgorithm,
        domain: &str,
        selector: &str,
    ) -> SignatureRecord {
        SignatureRecord::from_signature_bytes(
            msg.to_vec(),
            self.sign_bytes(msg, hash).as_slice(),
            hash,
            SignerId::new(domain, selector),
        )
    }
}
