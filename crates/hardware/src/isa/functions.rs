//! Alpha function codes, grouped by primary opcode.
//!
//! Integer operate groups use the 7-bit field at bits 11:5. Floating operate
//! groups use the 11-bit field at bits 15:5, whose low six bits select the
//! operation and whose upper bits carry rounding and trap qualifiers. The
//! miscellaneous group uses the 16-bit displacement field.

/// Integer arithmetic (opcode 0x10).
pub mod inta {
    /// Add longword.
    pub const ADDL: u32 = 0x00;
    /// Scaled-by-4 add longword.
    pub const S4ADDL: u32 = 0x02;
    /// Subtract longword.
    pub const SUBL: u32 = 0x09;
    /// Scaled-by-4 subtract longword.
    pub const S4SUBL: u32 = 0x0B;
    /// Compare bytes, unsigned greater or equal.
    pub const CMPBGE: u32 = 0x0F;
    /// Scaled-by-8 add longword.
    pub const S8ADDL: u32 = 0x12;
    /// Scaled-by-8 subtract longword.
    pub const S8SUBL: u32 = 0x1B;
    /// Compare unsigned less than.
    pub const CMPULT: u32 = 0x1D;
    /// Add quadword.
    pub const ADDQ: u32 = 0x20;
    /// Scaled-by-4 add quadword.
    pub const S4ADDQ: u32 = 0x22;
    /// Subtract quadword.
    pub const SUBQ: u32 = 0x29;
    /// Scaled-by-4 subtract quadword.
    pub const S4SUBQ: u32 = 0x2B;
    /// Compare equal.
    pub const CMPEQ: u32 = 0x2D;
    /// Scaled-by-8 add quadword.
    pub const S8ADDQ: u32 = 0x32;
    /// Scaled-by-8 subtract quadword.
    pub const S8SUBQ: u32 = 0x3B;
    /// Compare unsigned less or equal.
    pub const CMPULE: u32 = 0x3D;
    /// Add longword, trap on overflow.
    pub const ADDL_V: u32 = 0x40;
    /// Subtract longword, trap on overflow.
    pub const SUBL_V: u32 = 0x49;
    /// Compare signed less than.
    pub const CMPLT: u32 = 0x4D;
    /// Add quadword, trap on overflow.
    pub const ADDQ_V: u32 = 0x60;
    /// Subtract quadword, trap on overflow.
    pub const SUBQ_V: u32 = 0x69;
    /// Compare signed less or equal.
    pub const CMPLE: u32 = 0x6D;
}

/// Integer logical and conditional move (opcode 0x11).
pub mod intl {
    /// Logical AND.
    pub const AND: u32 = 0x00;
    /// AND with complement.
    pub const BIC: u32 = 0x08;
    /// Move if low bit set.
    pub const CMOVLBS: u32 = 0x14;
    /// Move if low bit clear.
    pub const CMOVLBC: u32 = 0x16;
    /// Logical OR.
    pub const BIS: u32 = 0x20;
    /// Move if zero.
    pub const CMOVEQ: u32 = 0x24;
    /// Move if nonzero.
    pub const CMOVNE: u32 = 0x26;
    /// OR with complement.
    pub const ORNOT: u32 = 0x28;
    /// Logical XOR.
    pub const XOR: u32 = 0x40;
    /// Move if negative.
    pub const CMOVLT: u32 = 0x44;
    /// Move if positive or zero.
    pub const CMOVGE: u32 = 0x46;
    /// XOR with complement.
    pub const EQV: u32 = 0x48;
    /// Architecture mask.
    pub const AMASK: u32 = 0x61;
    /// Move if negative or zero.
    pub const CMOVLE: u32 = 0x64;
    /// Move if positive.
    pub const CMOVGT: u32 = 0x66;
    /// Implementation version.
    pub const IMPLVER: u32 = 0x6C;
}

/// Shift and byte manipulation (opcode 0x12).
pub mod ints {
    /// Mask byte low.
    pub const MSKBL: u32 = 0x02;
    /// Extract byte low.
    pub const EXTBL: u32 = 0x06;
    /// Insert byte low.
    pub const INSBL: u32 = 0x0B;
    /// Mask word low.
    pub const MSKWL: u32 = 0x12;
    /// Extract word low.
    pub const EXTWL: u32 = 0x16;
    /// Insert word low.
    pub const INSWL: u32 = 0x1B;
    /// Mask longword low.
    pub const MSKLL: u32 = 0x22;
    /// Extract longword low.
    pub const EXTLL: u32 = 0x26;
    /// Insert longword low.
    pub const INSLL: u32 = 0x2B;
    /// Zero bytes.
    pub const ZAP: u32 = 0x30;
    /// Zero bytes not selected.
    pub const ZAPNOT: u32 = 0x31;
    /// Mask quadword low.
    pub const MSKQL: u32 = 0x32;
    /// Shift right logical.
    pub const SRL: u32 = 0x34;
    /// Extract quadword low.
    pub const EXTQL: u32 = 0x36;
    /// Shift left logical.
    pub const SLL: u32 = 0x39;
    /// Insert quadword low.
    pub const INSQL: u32 = 0x3B;
    /// Shift right arithmetic.
    pub const SRA: u32 = 0x3C;
    /// Mask word high.
    pub const MSKWH: u32 = 0x52;
    /// Insert word high.
    pub const INSWH: u32 = 0x57;
    /// Extract word high.
    pub const EXTWH: u32 = 0x5A;
    /// Mask longword high.
    pub const MSKLH: u32 = 0x62;
    /// Insert longword high.
    pub const INSLH: u32 = 0x67;
    /// Extract longword high.
    pub const EXTLH: u32 = 0x6A;
    /// Mask quadword high.
    pub const MSKQH: u32 = 0x72;
    /// Insert quadword high.
    pub const INSQH: u32 = 0x77;
    /// Extract quadword high.
    pub const EXTQH: u32 = 0x7A;
}

/// Integer multiply (opcode 0x13).
pub mod intm {
    /// Multiply longword.
    pub const MULL: u32 = 0x00;
    /// Multiply quadword.
    pub const MULQ: u32 = 0x20;
    /// Unsigned multiply quadword high.
    pub const UMULH: u32 = 0x30;
    /// Multiply longword, trap on overflow.
    pub const MULL_V: u32 = 0x40;
    /// Multiply quadword, trap on overflow.
    pub const MULQ_V: u32 = 0x60;
}

/// Integer-to-FP moves and square root (opcode 0x14).
pub mod itfp {
    /// Integer to S_floating move (full function code).
    pub const ITOFS: u32 = 0x004;
    /// Integer to T_floating move (full function code).
    pub const ITOFT: u32 = 0x024;
    /// S_floating square root (low six bits).
    pub const SQRTS: u32 = 0x0B;
    /// T_floating square root (low six bits).
    pub const SQRTT: u32 = 0x2B;
}

/// IEEE floating operate (opcode 0x16), low six bits of the function.
pub mod flti {
    /// Add S_floating.
    pub const ADDS: u32 = 0x00;
    /// Subtract S_floating.
    pub const SUBS: u32 = 0x01;
    /// Multiply S_floating.
    pub const MULS: u32 = 0x02;
    /// Divide S_floating.
    pub const DIVS: u32 = 0x03;
    /// Add T_floating.
    pub const ADDT: u32 = 0x20;
    /// Subtract T_floating.
    pub const SUBT: u32 = 0x21;
    /// Multiply T_floating.
    pub const MULT: u32 = 0x22;
    /// Divide T_floating.
    pub const DIVT: u32 = 0x23;
    /// Compare unordered.
    pub const CMPTUN: u32 = 0x24;
    /// Compare equal.
    pub const CMPTEQ: u32 = 0x25;
    /// Compare less than.
    pub const CMPTLT: u32 = 0x26;
    /// Compare less or equal.
    pub const CMPTLE: u32 = 0x27;
    /// Convert T_floating to S_floating.
    pub const CVTTS: u32 = 0x2C;
    /// Convert T_floating to quadword.
    pub const CVTTQ: u32 = 0x2F;
    /// Convert quadword to S_floating.
    pub const CVTQS: u32 = 0x3C;
    /// Convert quadword to T_floating.
    pub const CVTQT: u32 = 0x3E;
    /// Convert S_floating to T_floating (full function code).
    pub const CVTST: u32 = 0x2AC;
    /// Convert S_floating to T_floating, software completion (full function code).
    pub const CVTST_S: u32 = 0x6AC;
}

/// Datatype-independent floating operate (opcode 0x17), full function code.
pub mod fltl {
    /// Convert longword to quadword.
    pub const CVTLQ: u32 = 0x010;
    /// Copy sign.
    pub const CPYS: u32 = 0x020;
    /// Copy sign negated.
    pub const CPYSN: u32 = 0x021;
    /// Copy sign and exponent.
    pub const CPYSE: u32 = 0x022;
    /// Move to FPCR.
    pub const MT_FPCR: u32 = 0x024;
    /// Move from FPCR.
    pub const MF_FPCR: u32 = 0x025;
    /// FP move if zero.
    pub const FCMOVEQ: u32 = 0x02A;
    /// FP move if nonzero.
    pub const FCMOVNE: u32 = 0x02B;
    /// FP move if negative.
    pub const FCMOVLT: u32 = 0x02C;
    /// FP move if positive or zero.
    pub const FCMOVGE: u32 = 0x02D;
    /// FP move if negative or zero.
    pub const FCMOVLE: u32 = 0x02E;
    /// FP move if positive.
    pub const FCMOVGT: u32 = 0x02F;
    /// Convert quadword to longword.
    pub const CVTQL: u32 = 0x030;
    /// Convert quadword to longword, trap on overflow.
    pub const CVTQL_V: u32 = 0x130;
    /// Convert quadword to longword, trap on overflow, software completion.
    pub const CVTQL_SV: u32 = 0x530;
}

/// Miscellaneous (opcode 0x18), displacement field.
pub mod misc {
    /// Trap barrier.
    pub const TRAPB: u32 = 0x0000;
    /// Exception barrier.
    pub const EXCB: u32 = 0x0400;
    /// Memory barrier.
    pub const MB: u32 = 0x4000;
    /// Write memory barrier.
    pub const WMB: u32 = 0x4400;
    /// Prefetch hint.
    pub const FETCH: u32 = 0x8000;
    /// Prefetch with modify intent.
    pub const FETCH_M: u32 = 0xA000;
    /// Read process cycle counter.
    pub const RPCC: u32 = 0xC000;
    /// Read and clear the interrupt flag.
    pub const RC: u32 = 0xE000;
    /// Evict cache block.
    pub const ECB: u32 = 0xE800;
    /// Read and set the interrupt flag.
    pub const RS: u32 = 0xF000;
    /// Write hint, 64 bytes.
    pub const WH64: u32 = 0xF800;
    /// Write hint, 64 bytes, evict next.
    pub const WH64EN: u32 = 0xFC00;
}

/// Integer multimedia, count and FP-to-integer moves (opcode 0x1C).
pub mod fpti {
    /// Sign extend byte.
    pub const SEXTB: u32 = 0x00;
    /// Sign extend word.
    pub const SEXTW: u32 = 0x01;
    /// Count population.
    pub const CTPOP: u32 = 0x30;
    /// Pixel error.
    pub const PERR: u32 = 0x31;
    /// Count leading zero.
    pub const CTLZ: u32 = 0x32;
    /// Count trailing zero.
    pub const CTTZ: u32 = 0x33;
    /// Unpack bytes to words.
    pub const UNPKBW: u32 = 0x34;
    /// Unpack bytes to longwords.
    pub const UNPKBL: u32 = 0x35;
    /// Pack words to bytes.
    pub const PKWB: u32 = 0x36;
    /// Pack longwords to bytes.
    pub const PKLB: u32 = 0x37;
    /// Vector signed byte minimum.
    pub const MINSB8: u32 = 0x38;
    /// Vector signed word minimum.
    pub const MINSW4: u32 = 0x39;
    /// Vector unsigned byte minimum.
    pub const MINUB8: u32 = 0x3A;
    /// Vector unsigned word minimum.
    pub const MINUW4: u32 = 0x3B;
    /// Vector unsigned byte maximum.
    pub const MAXUB8: u32 = 0x3C;
    /// Vector unsigned word maximum.
    pub const MAXUW4: u32 = 0x3D;
    /// Vector signed byte maximum.
    pub const MAXSB8: u32 = 0x3E;
    /// Vector signed word maximum.
    pub const MAXSW4: u32 = 0x3F;
    /// T_floating to integer move.
    pub const FTOIT: u32 = 0x70;
    /// S_floating to integer move.
    pub const FTOIS: u32 = 0x78;
}

/// Computed jump kinds (opcode 0x1A, bits 15:14).
pub mod jump {
    /// Jump.
    pub const JMP: u32 = 0;
    /// Jump to subroutine.
    pub const JSR: u32 = 1;
    /// Return from subroutine.
    pub const RET: u32 = 2;
    /// Jump to subroutine return (coroutine linkage).
    pub const JSR_COROUTINE: u32 = 3;
}
