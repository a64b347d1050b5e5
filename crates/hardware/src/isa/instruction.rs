//! Instruction encoding and decoding utilities.
//!
//! Provides bit extraction functions for the Alpha instruction formats and
//! the [`Decoded`] descriptor produced by the decoder.
//!
//! | Format   | 31:26  | 25:21 | 20:16 | 15:0                                   |
//! |----------|--------|-------|-------|----------------------------------------|
//! | PAL      | opcode | function (25:0)                                         |
//! | Branch   | opcode | Ra    | displacement (20:0)                            |
//! | Memory   | opcode | Ra    | Rb    | displacement                           |
//! | Operate  | opcode | Ra    | Rb or literal (20:13), bit 12, func (11:5), Rc |
//! | FP op    | opcode | Fa    | Fb    | func (15:5), Fc (4:0)                  |

use crate::common::reg::ArchReg;
use crate::core::pipeline::signals::{FuTarget, Operation};

/// Bit mask for a 5-bit register field.
pub const REG_MASK: u32 = 0x1F;
/// Bit mask for the operate-format literal (bits 20:13).
pub const LITERAL_MASK: u32 = 0xFF;
/// Bit mask for the integer operate function (bits 11:5).
pub const INT_FUNC_MASK: u32 = 0x7F;
/// Bit mask for the floating operate function (bits 15:5).
pub const FP_FUNC_MASK: u32 = 0x7FF;
/// Bit mask for the CALL_PAL function (bits 25:0).
pub const PAL_FUNC_MASK: u32 = 0x03FF_FFFF;
/// Bit mask for the branch displacement (bits 20:0).
pub const BRANCH_DISP_MASK: u32 = 0x001F_FFFF;
/// Bit mask for the memory displacement (bits 15:0).
pub const MEM_DISP_MASK: u32 = 0xFFFF;
/// Bit mask for the HW_LD/HW_ST displacement (bits 11:0).
pub const HW_DISP_MASK: u32 = 0xFFF;

/// Sign-extends the low `bits` bits of `value`.
#[inline(always)]
pub const fn sign_extend(value: u64, bits: u32) -> i64 {
    let shift = 64 - bits;
    ((value << shift) as i64) >> shift
}

/// Trait for extracting Alpha instruction fields from encoded instructions.
pub trait InstructionBits {
    /// Primary opcode (bits 31:26).
    fn opcode(&self) -> u32;

    /// Ra / Fa field (bits 25:21).
    fn ra(&self) -> u8;

    /// Rb / Fb field (bits 20:16).
    fn rb(&self) -> u8;

    /// Rc / Fc field (bits 4:0).
    fn rc(&self) -> u8;

    /// True when an operate instruction uses the literal instead of Rb (bit 12).
    fn has_literal(&self) -> bool;

    /// Zero-extended 8-bit literal (bits 20:13).
    fn literal(&self) -> u64;

    /// Integer operate function (bits 11:5).
    fn int_func(&self) -> u32;

    /// Floating operate function including qualifiers (bits 15:5).
    fn fp_func(&self) -> u32;

    /// Sign-extended memory displacement (bits 15:0).
    fn mem_disp(&self) -> i64;

    /// Memory-format function field (bits 15:0), used by opcode 0x18.
    fn mem_func(&self) -> u32;

    /// Sign-extended branch displacement in instructions (bits 20:0).
    fn branch_disp(&self) -> i64;

    /// CALL_PAL function (bits 25:0).
    fn pal_func(&self) -> u32;

    /// Computed jump kind (bits 15:14).
    fn jump_kind(&self) -> u32;

    /// Computed jump target hint (bits 13:0).
    fn jump_hint(&self) -> u64;

    /// Internal processor register index for HW_MFPR/HW_MTPR (bits 15:8).
    fn ipr_index(&self) -> u8;

    /// Sign-extended HW_LD/HW_ST displacement (bits 11:0).
    fn hw_disp(&self) -> i64;

    /// HW_LD/HW_ST length bit (bit 12): quadword when set.
    fn hw_quad(&self) -> bool;
}

impl InstructionBits for u32 {
    #[inline(always)]
    fn opcode(&self) -> u32 {
        self >> 26
    }

    #[inline(always)]
    fn ra(&self) -> u8 {
        ((self >> 21) & REG_MASK) as u8
    }

    #[inline(always)]
    fn rb(&self) -> u8 {
        ((self >> 16) & REG_MASK) as u8
    }

    #[inline(always)]
    fn rc(&self) -> u8 {
        (self & REG_MASK) as u8
    }

    #[inline(always)]
    fn has_literal(&self) -> bool {
        (self >> 12) & 1 != 0
    }

    #[inline(always)]
    fn literal(&self) -> u64 {
        u64::from((self >> 13) & LITERAL_MASK)
    }

    #[inline(always)]
    fn int_func(&self) -> u32 {
        (self >> 5) & INT_FUNC_MASK
    }

    #[inline(always)]
    fn fp_func(&self) -> u32 {
        (self >> 5) & FP_FUNC_MASK
    }

    #[inline(always)]
    fn mem_disp(&self) -> i64 {
        sign_extend(u64::from(self & MEM_DISP_MASK), 16)
    }

    #[inline(always)]
    fn mem_func(&self) -> u32 {
        self & MEM_DISP_MASK
    }

    #[inline(always)]
    fn branch_disp(&self) -> i64 {
        sign_extend(u64::from(self & BRANCH_DISP_MASK), 21)
    }

    #[inline(always)]
    fn pal_func(&self) -> u32 {
        self & PAL_FUNC_MASK
    }

    #[inline(always)]
    fn jump_kind(&self) -> u32 {
        (self >> 14) & 0x3
    }

    #[inline(always)]
    fn jump_hint(&self) -> u64 {
        u64::from(self & 0x3FFF)
    }

    #[inline(always)]
    fn ipr_index(&self) -> u8 {
        ((self >> 8) & 0xFF) as u8
    }

    #[inline(always)]
    fn hw_disp(&self) -> i64 {
        sign_extend(u64::from(self & HW_DISP_MASK), 12)
    }

    #[inline(always)]
    fn hw_quad(&self) -> bool {
        (self >> 12) & 1 != 0
    }
}

/// Second operand of an instruction: a register or an operate literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandB {
    /// Value comes from a register (possibly R31/F31).
    Reg(ArchReg),
    /// Zero-extended 8-bit literal.
    Literal(u64),
    /// The instruction has no second operand.
    None,
}

/// Decoded instruction descriptor.
///
/// Operand roles are fixed per slot so the rename and execute stages never
/// reinterpret encodings:
/// - `a`: Ra/Fa, the first operand (store data, branch condition, link source).
/// - `b`: Rb/Fb or the operate literal (memory base, jump target).
/// - `c`: the old destination value, read by conditional moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decoded {
    /// Raw 32-bit instruction encoding.
    pub raw: u32,
    /// Operation and its qualifiers.
    pub op: Operation,
    /// Register written, `None` for R31/F31 or instructions without a result.
    pub dest: Option<ArchReg>,
    /// First source operand.
    pub a: Option<ArchReg>,
    /// Second source operand.
    pub b: OperandB,
    /// Old value of the destination (conditional moves only).
    pub c: Option<ArchReg>,
    /// Sign-extended displacement: bytes for memory formats (already scaled
    /// for LDAH), bytes from the updated PC for branches.
    pub disp: i64,
    /// Executable in PAL mode only (HW_* instructions).
    pub pal_only: bool,
}

impl Decoded {
    /// Functional unit that executes this instruction.
    #[inline]
    pub const fn unit(&self) -> FuTarget {
        self.op.unit()
    }

    /// Iterates over the register sources in slot order.
    pub fn sources(&self) -> [Option<ArchReg>; 3] {
        let b = match self.b {
            OperandB::Reg(r) => Some(r),
            OperandB::Literal(_) | OperandB::None => None,
        };
        [self.a, b, self.c]
    }
}
