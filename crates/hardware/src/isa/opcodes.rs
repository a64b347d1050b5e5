//! Alpha primary opcodes (instruction bits 31:26).

/// PALcode call (CALL_PAL).
pub const OP_CALL_PAL: u32 = 0x00;

/// Load address (LDA).
pub const OP_LDA: u32 = 0x08;
/// Load address high (LDAH).
pub const OP_LDAH: u32 = 0x09;
/// Load zero-extended byte (LDBU).
pub const OP_LDBU: u32 = 0x0A;
/// Load unaligned quadword (LDQ_U).
pub const OP_LDQ_U: u32 = 0x0B;
/// Load zero-extended word (LDWU).
pub const OP_LDWU: u32 = 0x0C;
/// Store word (STW).
pub const OP_STW: u32 = 0x0D;
/// Store byte (STB).
pub const OP_STB: u32 = 0x0E;
/// Store unaligned quadword (STQ_U).
pub const OP_STQ_U: u32 = 0x0F;

/// Integer arithmetic operate group.
pub const OP_INTA: u32 = 0x10;
/// Integer logical and conditional-move operate group.
pub const OP_INTL: u32 = 0x11;
/// Integer shift and byte-manipulation operate group.
pub const OP_INTS: u32 = 0x12;
/// Integer multiply operate group.
pub const OP_INTM: u32 = 0x13;
/// Integer-to-FP move and square root group.
pub const OP_ITFP: u32 = 0x14;
/// VAX floating operate group (not implemented).
pub const OP_FLTV: u32 = 0x15;
/// IEEE floating operate group.
pub const OP_FLTI: u32 = 0x16;
/// Floating operate group independent of data type.
pub const OP_FLTL: u32 = 0x17;
/// Miscellaneous (barriers, hints, cycle counter).
pub const OP_MISC: u32 = 0x18;
/// PAL-mode read of an internal processor register.
pub const OP_HW_MFPR: u32 = 0x19;
/// Computed jumps (JMP, JSR, RET, JSR_COROUTINE).
pub const OP_JSR: u32 = 0x1A;
/// PAL-mode physical load.
pub const OP_HW_LD: u32 = 0x1B;
/// FP-to-integer move, sign extension, count and multimedia group.
pub const OP_FPTI: u32 = 0x1C;
/// PAL-mode write of an internal processor register.
pub const OP_HW_MTPR: u32 = 0x1D;
/// PAL-mode return.
pub const OP_HW_RET: u32 = 0x1E;
/// PAL-mode physical store.
pub const OP_HW_ST: u32 = 0x1F;

/// Load VAX F_floating (not implemented).
pub const OP_LDF: u32 = 0x20;
/// Load VAX G_floating (not implemented).
pub const OP_LDG: u32 = 0x21;
/// Load IEEE S_floating.
pub const OP_LDS: u32 = 0x22;
/// Load IEEE T_floating.
pub const OP_LDT: u32 = 0x23;
/// Store VAX F_floating (not implemented).
pub const OP_STF: u32 = 0x24;
/// Store VAX G_floating (not implemented).
pub const OP_STG: u32 = 0x25;
/// Store IEEE S_floating.
pub const OP_STS: u32 = 0x26;
/// Store IEEE T_floating.
pub const OP_STT: u32 = 0x27;

/// Load sign-extended longword.
pub const OP_LDL: u32 = 0x28;
/// Load quadword.
pub const OP_LDQ: u32 = 0x29;
/// Load longword locked.
pub const OP_LDL_L: u32 = 0x2A;
/// Load quadword locked.
pub const OP_LDQ_L: u32 = 0x2B;
/// Store longword.
pub const OP_STL: u32 = 0x2C;
/// Store quadword.
pub const OP_STQ: u32 = 0x2D;
/// Store longword conditional.
pub const OP_STL_C: u32 = 0x2E;
/// Store quadword conditional.
pub const OP_STQ_C: u32 = 0x2F;

/// Unconditional branch.
pub const OP_BR: u32 = 0x30;
/// Branch if Fa is zero.
pub const OP_FBEQ: u32 = 0x31;
/// Branch if Fa is negative.
pub const OP_FBLT: u32 = 0x32;
/// Branch if Fa is negative or zero.
pub const OP_FBLE: u32 = 0x33;
/// Branch to subroutine.
pub const OP_BSR: u32 = 0x34;
/// Branch if Fa is nonzero.
pub const OP_FBNE: u32 = 0x35;
/// Branch if Fa is positive or zero.
pub const OP_FBGE: u32 = 0x36;
/// Branch if Fa is positive.
pub const OP_FBGT: u32 = 0x37;
/// Branch if the low bit of Ra is clear.
pub const OP_BLBC: u32 = 0x38;
/// Branch if Ra is zero.
pub const OP_BEQ: u32 = 0x39;
/// Branch if Ra is negative.
pub const OP_BLT: u32 = 0x3A;
/// Branch if Ra is negative or zero.
pub const OP_BLE: u32 = 0x3B;
/// Branch if the low bit of Ra is set.
pub const OP_BLBS: u32 = 0x3C;
/// Branch if Ra is nonzero.
pub const OP_BNE: u32 = 0x3D;
/// Branch if Ra is positive or zero.
pub const OP_BGE: u32 = 0x3E;
/// Branch if Ra is positive.
pub const OP_BGT: u32 = 0x3F;
