//! Alpha instruction encoders.
//!
//! One function per format, plus named helpers for the instructions the
//! tests use most. Register numbers are 0-31; displacements are in bytes
//! for memory format and in instructions for branch format.

use axp_core::isa::functions::{flti, inta, intl, jump};
use axp_core::isa::opcodes::{
    OP_BEQ, OP_BNE, OP_BR, OP_FLTI, OP_HW_MTPR, OP_HW_RET, OP_INTA, OP_INTL, OP_JSR, OP_LDA,
    OP_LDAH, OP_LDL, OP_LDQ, OP_LDQ_L, OP_STL, OP_STQ, OP_STQ_C,
};

/// Zero register.
pub const ZERO: u32 = 31;

/// Memory format: `op ra, disp(rb)`.
pub const fn mem(op: u32, ra: u32, rb: u32, disp: i16) -> u32 {
    (op << 26) | (ra << 21) | (rb << 16) | (disp as u16 as u32)
}

/// Branch format: `op ra, disp` with `disp` counted in instructions.
pub const fn branch(op: u32, ra: u32, disp: i32) -> u32 {
    (op << 26) | (ra << 21) | ((disp as u32) & 0x1F_FFFF)
}

/// Operate format with a register Rb.
pub const fn opr(op: u32, func: u32, ra: u32, rb: u32, rc: u32) -> u32 {
    (op << 26) | (ra << 21) | (rb << 16) | (func << 5) | rc
}

/// Operate format with an 8-bit literal in place of Rb.
pub const fn opr_lit(op: u32, func: u32, ra: u32, lit: u8, rc: u32) -> u32 {
    (op << 26) | (ra << 21) | ((lit as u32) << 13) | (1 << 12) | (func << 5) | rc
}

/// Floating-point operate format.
pub const fn fp(op: u32, func: u32, fa: u32, fb: u32, fc: u32) -> u32 {
    (op << 26) | (fa << 21) | (fb << 16) | (func << 5) | fc
}

/// Memory-format jump (`JMP`, `JSR`, `RET`, `JSR_COROUTINE`).
pub const fn jmp(kind: u32, ra: u32, rb: u32) -> u32 {
    (OP_JSR << 26) | (ra << 21) | (rb << 16) | (kind << 14)
}

/// CALL_PAL with function code `function`.
pub const fn call_pal(function: u32) -> u32 {
    function & 0x03FF_FFFF
}

/// `LDA ra, disp(R31)`: loads a sign-extended 16-bit literal.
pub const fn li(ra: u32, value: i16) -> u32 {
    mem(OP_LDA, ra, ZERO, value)
}

/// `LDA ra, disp(rb)`.
pub const fn lda(ra: u32, rb: u32, disp: i16) -> u32 {
    mem(OP_LDA, ra, rb, disp)
}

/// `LDAH ra, disp(rb)`: adds `disp << 16`.
pub const fn ldah(ra: u32, rb: u32, disp: i16) -> u32 {
    mem(OP_LDAH, ra, rb, disp)
}

/// `ADDQ ra, rb, rc`.
pub const fn addq(ra: u32, rb: u32, rc: u32) -> u32 {
    opr(OP_INTA, inta::ADDQ, ra, rb, rc)
}

/// `ADDQ ra, #lit, rc`.
pub const fn addq_lit(ra: u32, lit: u8, rc: u32) -> u32 {
    opr_lit(OP_INTA, inta::ADDQ, ra, lit, rc)
}

/// `SUBQ ra, rb, rc`.
pub const fn subq(ra: u32, rb: u32, rc: u32) -> u32 {
    opr(OP_INTA, inta::SUBQ, ra, rb, rc)
}

/// `SUBQ ra, #lit, rc`.
pub const fn subq_lit(ra: u32, lit: u8, rc: u32) -> u32 {
    opr_lit(OP_INTA, inta::SUBQ, ra, lit, rc)
}

/// `XOR ra, rb, rc`.
pub const fn xor(ra: u32, rb: u32, rc: u32) -> u32 {
    opr(OP_INTL, intl::XOR, ra, rb, rc)
}

/// `BIS ra, rb, rc` (register move when `ra` is R31).
pub const fn bis(ra: u32, rb: u32, rc: u32) -> u32 {
    opr(OP_INTL, intl::BIS, ra, rb, rc)
}

/// `LDQ ra, disp(rb)`.
pub const fn ldq(ra: u32, rb: u32, disp: i16) -> u32 {
    mem(OP_LDQ, ra, rb, disp)
}

/// `LDL ra, disp(rb)`.
pub const fn ldl(ra: u32, rb: u32, disp: i16) -> u32 {
    mem(OP_LDL, ra, rb, disp)
}

/// `STQ ra, disp(rb)`.
pub const fn stq(ra: u32, rb: u32, disp: i16) -> u32 {
    mem(OP_STQ, ra, rb, disp)
}

/// `STL ra, disp(rb)`.
pub const fn stl(ra: u32, rb: u32, disp: i16) -> u32 {
    mem(OP_STL, ra, rb, disp)
}

/// `LDQ_L ra, disp(rb)`.
pub const fn ldq_l(ra: u32, rb: u32, disp: i16) -> u32 {
    mem(OP_LDQ_L, ra, rb, disp)
}

/// `STQ_C ra, disp(rb)`.
pub const fn stq_c(ra: u32, rb: u32, disp: i16) -> u32 {
    mem(OP_STQ_C, ra, rb, disp)
}

/// `BEQ ra, disp`.
pub const fn beq(ra: u32, disp: i32) -> u32 {
    branch(OP_BEQ, ra, disp)
}

/// `BNE ra, disp`.
pub const fn bne(ra: u32, disp: i32) -> u32 {
    branch(OP_BNE, ra, disp)
}

/// `BR R31, disp`.
pub const fn br(disp: i32) -> u32 {
    branch(OP_BR, ZERO, disp)
}

/// `RET R31, (rb)`.
pub const fn ret(rb: u32) -> u32 {
    jmp(jump::RET, ZERO, rb)
}

/// `JSR ra, (rb)`.
pub const fn jsr(ra: u32, rb: u32) -> u32 {
    jmp(jump::JSR, ra, rb)
}

/// `DIVT fa, fb, fc` with normal rounding.
pub const fn divt(fa: u32, fb: u32, fc: u32) -> u32 {
    fp(OP_FLTI, 0x080 | flti::DIVT, fa, fb, fc)
}

/// `ADDT fa, fb, fc` with normal rounding.
pub const fn addt(fa: u32, fb: u32, fc: u32) -> u32 {
    fp(OP_FLTI, 0x080 | flti::ADDT, fa, fb, fc)
}

/// `HW_MTPR rb, ipr`.
pub const fn hw_mtpr(rb: u32, ipr: u8) -> u32 {
    (OP_HW_MTPR << 26) | (rb << 16) | ((ipr as u32) << 8)
}

/// `HW_RET (rb)`.
pub const fn hw_ret(rb: u32) -> u32 {
    (OP_HW_RET << 26) | (rb << 16)
}

/// `BIS R31, R31, R31`, the canonical integer no-op.
pub const NOP: u32 = opr(OP_INTL, intl::BIS, ZERO, ZERO, ZERO);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodings_match_known_words() {
        assert_eq!(li(1, 7), 0x203F_0007);
        assert_eq!(addq(1, 1, 2), 0x4021_0402);
        assert_eq!(NOP, 0x47FF_041F);
    }
}
