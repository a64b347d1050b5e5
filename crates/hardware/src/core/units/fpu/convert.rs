//! Register-format conversions.
//!
//! FP registers always hold 64-bit T-format patterns. S_floating values are
//! expanded on load (LDS, ITOFS) and compressed on store (STS); longword
//! integers produced by CVTQL live in the same scattered layout, so STS
//! writes them back out as plain longwords.
//!
//! | Memory bits | Register bits (S value)            | Register bits (longword) |
//! |-------------|------------------------------------|--------------------------|
//! | 31          | 63                                 | 63                       |
//! | 30:23 exp   | 62:52, exponent re-biased          | 62 (bit 30)              |
//! | 22:0 frac   | 51:29                              | 58:29 (bits 29:0)        |

/// S exponent field value for infinities and NaNs.
const S_EXP_MAX: u64 = 0xFF;
/// T exponent field value for infinities and NaNs.
const T_EXP_MAX: u64 = 0x7FF;
/// Difference between the T and S exponent biases.
const BIAS_ADJUST: u64 = 1023 - 127;

/// Expands an S_floating memory longword into register format (LDS).
pub const fn s_to_register(mem: u32) -> u64 {
    let mem = mem as u64;
    let sign = (mem >> 31) & 1;
    let exp = (mem >> 23) & S_EXP_MAX;
    let frac = mem & 0x7F_FFFF;
    let exp = match exp {
        S_EXP_MAX => T_EXP_MAX,
        0 => 0,
        e => e + BIAS_ADJUST,
    };
    (sign << 63) | (exp << 52) | (frac << 29)
}

/// Compresses a register into an S_floating or longword memory image (STS).
pub const fn register_to_s(reg: u64) -> u32 {
    ((((reg >> 62) & 0x3) << 30) | ((reg >> 29) & 0x3FFF_FFFF)) as u32
}

/// Places a longword into the register layout used by CVTQL.
pub const fn longword_to_register(value: u32) -> u64 {
    let value = value as u64;
    (((value >> 30) & 0x3) << 62) | ((value & 0x3FFF_FFFF) << 29)
}

/// Sign-extended longword held in register layout (CVTLQ, FTOIS).
pub const fn register_to_longword(reg: u64) -> i64 {
    register_to_s(reg) as i32 as i64
}

/// Register pattern of an `f32` result.
#[inline]
pub fn s_result(value: f32) -> u64 {
    s_to_register(value.to_bits())
}

/// `f32` view of a register holding an S value.
#[inline]
pub fn s_operand(reg: u64) -> f32 {
    f32::from_bits(register_to_s(reg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_s_values_expand_to_t() {
        for v in [1.0f32, -2.5, 3.4e38, 1.2e-38, 0.1] {
            assert_eq!(s_to_register(v.to_bits()), f64::from(v).to_bits());
        }
    }

    #[test]
    fn specials_keep_their_class() {
        assert_eq!(s_to_register(f32::INFINITY.to_bits()), f64::INFINITY.to_bits());
        assert_eq!(s_to_register(0x8000_0000), 0x8000_0000_0000_0000);
        assert!(f64::from_bits(s_to_register(0x7FC0_0000)).is_nan());
    }

    #[test]
    fn sts_inverts_lds() {
        for bits in [0u32, 0x3F80_0000, 0xBF80_0001, 0x7F80_0000, 0x0040_0000] {
            assert_eq!(register_to_s(s_to_register(bits)), bits);
        }
    }

    #[test]
    fn longword_layout() {
        let reg = longword_to_register(0xFFFF_FFFE);
        assert_eq!(register_to_longword(reg), -2);
        assert_eq!(register_to_s(reg), 0xFFFF_FFFE);
    }
}
