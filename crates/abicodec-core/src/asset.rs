//! Symbol and asset text forms.
//!
//! A symbol code is up to seven uppercase letters packed byte-for-byte into
//! a `u64` (first letter in the lowest byte). A symbol adds a precision
//! byte below the code (`"4,EOS"`), and an asset pairs a signed 64-bit
//! amount with a symbol (`"1.0000 EOS"` — the number of decimal places in
//! the text IS the precision).

use crate::error::CodecError;
use std::fmt;
use std::str::FromStr;

/// Largest asset magnitude the chain accepts (2^62 - 1).
const MAX_AMOUNT: i64 = (1 << 62) - 1;

/// Up to seven uppercase letters, byte-packed into a `u64`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SymbolCode(u64);

impl SymbolCode {
    pub const fn from_u64(value: u64) -> Self {
        SymbolCode(value)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl FromStr for SymbolCode {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.is_empty() || bytes.len() > 7 || !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(CodecError::Expected {
                expected: "symbol code (1-7 uppercase letters)",
                got: s.to_string(),
            });
        }
        let mut value: u64 = 0;
        for (i, &b) in bytes.iter().enumerate() {
            value |= (b as u64) << (8 * i);
        }
        Ok(SymbolCode(value))
    }
}

impl fmt::Display for SymbolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tmp = self.0;
        while tmp & 0xff != 0 {
            write!(f, "{}", (tmp & 0xff) as u8 as char)?;
            tmp >>= 8;
        }
        Ok(())
    }
}

/// Precision byte plus symbol code; text form `"<precision>,<CODE>"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Symbol(u64);

impl Symbol {
    pub fn new(precision: u8, code: SymbolCode) -> Self {
        Symbol(precision as u64 | (code.as_u64() << 8))
    }

    pub const fn from_u64(value: u64) -> Self {
        Symbol(value)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }

    pub const fn precision(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    pub const fn code(self) -> SymbolCode {
        SymbolCode::from_u64(self.0 >> 8)
    }
}

impl FromStr for Symbol {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || CodecError::Expected {
            expected: "symbol like '4,EOS'",
            got: s.to_string(),
        };
        let (precision, code) = s.split_once(',').ok_or_else(bad)?;
        let precision: u8 = precision.parse().map_err(|_| bad())?;
        Ok(Symbol::new(precision, code.parse()?))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.precision(), self.code())
    }
}

/// A signed amount with a symbol; text form `"-1.0000 EOS"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Asset {
    pub amount: i64,
    pub symbol: Symbol,
}

impl FromStr for Asset {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || CodecError::Expected {
            expected: "asset like '1.0000 EOS'",
            got: s.to_string(),
        };
        let s_trimmed = s.trim();
        let (number, code) = s_trimmed.split_once(' ').ok_or_else(bad)?;

        let (negative, digits) = match number.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, number),
        };
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, f),
            None => (digits, ""),
        };
        if int_part.is_empty()
            || !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(bad());
        }
        let precision = frac_part.len();
        if precision > 18 {
            return Err(CodecError::OutOfRange {
                ty: "asset".into(),
                value: s.to_string(),
            });
        }

        let mut amount: i64 = 0;
        for b in int_part.bytes().chain(frac_part.bytes()) {
            amount = amount
                .checked_mul(10)
                .and_then(|a| a.checked_add((b - b'0') as i64))
                .filter(|&a| a <= MAX_AMOUNT)
                .ok_or_else(|| CodecError::OutOfRange {
                    ty: "asset".into(),
                    value: s.to_string(),
                })?;
        }
        if negative {
            amount = -amount;
        }

        Ok(Asset {
            amount,
            symbol: Symbol::new(precision as u8, code.parse()?),
        })
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Digit-string manipulation rather than 10^p arithmetic: wire
        // payloads may carry any precision byte, well past what u64 holds.
        let precision = self.symbol.precision() as usize;
        let sign = if self.amount < 0 { "-" } else { "" };
        let digits = self.amount.unsigned_abs().to_string();
        if precision == 0 {
            write!(f, "{sign}{digits} {}", self.symbol.code())
        } else {
            let padded = format!("{digits:0>width$}", width = precision + 1);
            let (int_part, frac_part) = padded.split_at(padded.len() - precision);
            write!(f, "{sign}{int_part}.{frac_part} {}", self.symbol.code())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_code_round_trip() {
        for s in ["EOS", "VEX", "A", "SYSTOKEN"] {
            if s.len() <= 7 {
                assert_eq!(s.parse::<SymbolCode>().unwrap().to_string(), s);
            } else {
                assert!(s.parse::<SymbolCode>().is_err());
            }
        }
        assert!("eos".parse::<SymbolCode>().is_err());
        assert!("".parse::<SymbolCode>().is_err());
    }

    #[test]
    fn symbol_packing() {
        let sym: Symbol = "4,EOS".parse().unwrap();
        assert_eq!(sym.as_u64(), 0x534f_4504);
        assert_eq!(sym.precision(), 4);
        assert_eq!(sym.to_string(), "4,EOS");
    }

    #[test]
    fn asset_round_trip() {
        for s in [
            "1.0000 EOS",
            "0.0000 VEX",
            "-1.0000 VEX",
            "1000000000.0000 VEX",
            "5 TOK",
            "-0.001 ABC",
        ] {
            let asset: Asset = s.parse().unwrap();
            assert_eq!(asset.to_string(), s, "round-trip of '{s}'");
        }
    }

    #[test]
    fn asset_amount_and_precision() {
        let a: Asset = "1.0000 EOS".parse().unwrap();
        assert_eq!(a.amount, 10_000);
        assert_eq!(a.symbol.precision(), 4);
        let b: Asset = "-0.5000 EOS".parse().unwrap();
        assert_eq!(b.amount, -5_000);
    }

    #[test]
    fn asset_rejects_garbage() {
        for s in ["EOS", "1.0000", "1..0 EOS", "x.y EOS", "1.0000 eos", "- 1 EOS"] {
            assert!(s.parse::<Asset>().is_err(), "should reject '{s}'");
        }
    }

    #[test]
    fn asset_rejects_overflow() {
        assert!("4611686018427387.904 EOS".parse::<Asset>().is_err());
        assert!("1.0000000000000000000 EOS".parse::<Asset>().is_err());
    }
}
