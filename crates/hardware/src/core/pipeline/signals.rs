//! Operation classes and their qualifiers.
//!
//! This module defines the closed set of operations the engine executes. It performs:
//! 1. **Operation Classification:** Integer, floating, load, store, branch, system and no-op classes.
//! 2. **Unit Selection:** Each class maps to exactly one functional unit (Ebox, Fbox, Mbox).
//! 3. **Qualifier Decoding:** FP rounding and trap qualifiers, memory widths and conditions.
//! 4. **Scheduling Properties:** Which operations must wait for the head of the reorder buffer.

use crate::core::units::fpu::rounding_modes::RoundingQualifier;

/// Functional unit an operation is dispatched to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FuTarget {
    /// Integer execution box.
    Ebox,
    /// Floating-point execution box.
    Fbox,
    /// Memory (load/store) box.
    Mbox,
}

/// Register-value conditions shared by branches and conditional moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cond {
    /// Low bit clear.
    Lbc,
    /// Low bit set.
    Lbs,
    /// Equal to zero.
    Eq,
    /// Not equal to zero.
    Ne,
    /// Less than zero.
    Lt,
    /// Greater or equal to zero.
    Ge,
    /// Less or equal to zero.
    Le,
    /// Greater than zero.
    Gt,
}

impl Cond {
    /// Evaluates the condition on an integer register.
    #[inline]
    pub const fn eval_int(self, value: u64) -> bool {
        let v = value as i64;
        match self {
            Self::Lbc => value & 1 == 0,
            Self::Lbs => value & 1 != 0,
            Self::Eq => v == 0,
            Self::Ne => v != 0,
            Self::Lt => v < 0,
            Self::Ge => v >= 0,
            Self::Le => v <= 0,
            Self::Gt => v > 0,
        }
    }

    /// Evaluates the condition on a floating register bit pattern.
    ///
    /// Both +0 and -0 compare equal to zero; the sign bit alone decides
    /// the sign of every other pattern.
    #[inline]
    pub const fn eval_fp(self, bits: u64) -> bool {
        let zero = bits << 1 == 0;
        let negative = (bits >> 63) != 0;
        match self {
            Self::Eq => zero,
            Self::Ne => !zero,
            Self::Lt => negative && !zero,
            Self::Ge => !negative || zero,
            Self::Le => negative || zero,
            Self::Gt => !negative && !zero,
            Self::Lbc | Self::Lbs => false,
        }
    }
}

/// Lane width of a byte-manipulation instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ByteWidth {
    /// One byte.
    Byte,
    /// Two bytes.
    Word,
    /// Four bytes.
    Long,
    /// Eight bytes.
    Quad,
}

impl ByteWidth {
    /// Byte mask covering the lane (bit n selects byte n).
    #[inline]
    pub const fn byte_mask(self) -> u64 {
        match self {
            Self::Byte => 0x01,
            Self::Word => 0x03,
            Self::Long => 0x0F,
            Self::Quad => 0xFF,
        }
    }
}

/// Which half of an unaligned datum a byte-manipulation instruction handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Half {
    /// Low part (xxxL forms).
    Low,
    /// High part (xxxH forms).
    High,
}

/// Integer operations executed by the Ebox.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntOp {
    /// Ra <- Rb + disp.
    Lda,
    /// Ra <- Rb + disp * 65536.
    Ldah,
    /// Longword add.
    Addl,
    /// Longword add, trap on overflow.
    AddlV,
    /// Scaled longword add (scale 4 or 8).
    ScaledAddl(u8),
    /// Longword subtract.
    Subl,
    /// Longword subtract, trap on overflow.
    SublV,
    /// Scaled longword subtract (scale 4 or 8).
    ScaledSubl(u8),
    /// Quadword add.
    Addq,
    /// Quadword add, trap on overflow.
    AddqV,
    /// Scaled quadword add (scale 4 or 8).
    ScaledAddq(u8),
    /// Quadword subtract.
    Subq,
    /// Quadword subtract, trap on overflow.
    SubqV,
    /// Scaled quadword subtract (scale 4 or 8).
    ScaledSubq(u8),
    /// Byte-wise unsigned compare.
    Cmpbge,
    /// Compare equal.
    Cmpeq,
    /// Compare signed less than.
    Cmplt,
    /// Compare signed less or equal.
    Cmple,
    /// Compare unsigned less than.
    Cmpult,
    /// Compare unsigned less or equal.
    Cmpule,
    /// AND.
    And,
    /// AND NOT.
    Bic,
    /// OR.
    Bis,
    /// OR NOT.
    Ornot,
    /// XOR.
    Xor,
    /// XOR NOT.
    Eqv,
    /// Conditional move on Ra.
    Cmov(Cond),
    /// Clear implemented feature bits.
    Amask,
    /// Implementation version.
    Implver,
    /// Byte mask.
    Msk(ByteWidth, Half),
    /// Byte extract.
    Ext(ByteWidth, Half),
    /// Byte insert.
    Ins(ByteWidth, Half),
    /// Zero selected bytes.
    Zap,
    /// Zero unselected bytes.
    Zapnot,
    /// Shift left logical.
    Sll,
    /// Shift right logical.
    Srl,
    /// Shift right arithmetic.
    Sra,
    /// Longword multiply.
    Mull,
    /// Longword multiply, trap on overflow.
    MullV,
    /// Quadword multiply.
    Mulq,
    /// Quadword multiply, trap on overflow.
    MulqV,
    /// Unsigned quadword multiply high.
    Umulh,
    /// Sign extend byte.
    Sextb,
    /// Sign extend word.
    Sextw,
    /// Population count.
    Ctpop,
    /// Leading zero count.
    Ctlz,
    /// Trailing zero count.
    Cttz,
    /// Sum of absolute byte differences.
    Perr,
    /// Unpack bytes to words.
    Unpkbw,
    /// Unpack bytes to longwords.
    Unpkbl,
    /// Pack words to bytes.
    Pkwb,
    /// Pack longwords to bytes.
    Pklb,
    /// Lane-wise minimum or maximum.
    MinMax(MinMax),
    /// Raw move from an FP register.
    Ftoit,
    /// S_floating register to longword integer.
    Ftois,
}

/// Multimedia lane-wise minimum/maximum variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MinMax {
    /// Signed byte minimum.
    Minsb8,
    /// Signed word minimum.
    Minsw4,
    /// Unsigned byte minimum.
    Minub8,
    /// Unsigned word minimum.
    Minuw4,
    /// Unsigned byte maximum.
    Maxub8,
    /// Unsigned word maximum.
    Maxuw4,
    /// Signed byte maximum.
    Maxsb8,
    /// Signed word maximum.
    Maxsw4,
}

impl IntOp {
    /// True for operations that can raise an integer overflow trap.
    pub const fn can_trap(self) -> bool {
        matches!(
            self,
            Self::AddlV | Self::SublV | Self::AddqV | Self::SubqV | Self::MullV | Self::MulqV
        )
    }

    /// True for multiplies, which use the longer multiplier latency.
    pub const fn is_multiply(self) -> bool {
        matches!(
            self,
            Self::Mull | Self::MullV | Self::Mulq | Self::MulqV | Self::Umulh
        )
    }
}

/// IEEE data format of an FP operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FpFormat {
    /// Single precision.
    S,
    /// Double precision.
    T,
}

/// Two-operand IEEE arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FpArith {
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Division.
    Div,
}

/// IEEE compare predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FpCompare {
    /// Unordered.
    Un,
    /// Equal.
    Eq,
    /// Less than.
    Lt,
    /// Less or equal.
    Le,
}

/// Rounding and trap qualifiers of an IEEE instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FpQualifiers {
    /// Rounding mode field (bits 12:11 of the instruction).
    pub rounding: RoundingQualifier,
    /// /U on arithmetic, /V on conversions to integer.
    pub underflow_or_overflow: bool,
    /// /I: trap on inexact.
    pub inexact: bool,
    /// /S: software completion; FPCR disable bits are honored.
    pub software: bool,
}

impl FpQualifiers {
    /// Round-to-nearest with no trap qualifiers.
    pub const NORMAL: Self = Self {
        rounding: RoundingQualifier::Normal,
        underflow_or_overflow: false,
        inexact: false,
        software: false,
    };

    /// Splits an 11-bit FP function field into its qualifiers.
    pub const fn from_func(func: u32) -> Self {
        Self {
            rounding: RoundingQualifier::from_bits(((func >> 6) & 0x3) as u8),
            underflow_or_overflow: func & 0x100 != 0,
            inexact: func & 0x200 != 0,
            software: func & 0x400 != 0,
        }
    }
}

/// Floating-point operations executed by the Fbox.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FpOp {
    /// ADDx, SUBx, MULx, DIVx.
    Arith(FpArith, FpFormat, FpQualifiers),
    /// SQRTS, SQRTT.
    Sqrt(FpFormat, FpQualifiers),
    /// CMPTxx.
    Compare(FpCompare, FpQualifiers),
    /// T_floating to S_floating.
    Cvtts(FpQualifiers),
    /// S_floating to T_floating.
    Cvtst(FpQualifiers),
    /// T_floating to quadword integer.
    Cvttq(FpQualifiers),
    /// Quadword integer to S_floating.
    Cvtqs(FpQualifiers),
    /// Quadword integer to T_floating.
    Cvtqt(FpQualifiers),
    /// Longword register format to quadword.
    Cvtlq,
    /// Quadword to longword register format.
    Cvtql(FpQualifiers),
    /// Copy sign.
    Cpys,
    /// Copy negated sign.
    Cpysn,
    /// Copy sign and exponent.
    Cpyse,
    /// Conditional move on Fa.
    Fcmov(Cond),
    /// Integer register to S_floating.
    Itofs,
    /// Integer register to T_floating (raw bits).
    Itoft,
}

impl FpOp {
    /// True for operations that can raise an arithmetic trap.
    pub const fn can_trap(self) -> bool {
        matches!(
            self,
            Self::Arith(..)
                | Self::Sqrt(..)
                | Self::Compare(..)
                | Self::Cvtts(_)
                | Self::Cvtst(_)
                | Self::Cvttq(_)
                | Self::Cvtqs(_)
                | Self::Cvtqt(_)
                | Self::Cvtql(_)
        )
    }
}

/// Width of a memory access in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MemWidth {
    /// 1 byte.
    Byte,
    /// 2 bytes.
    Word,
    /// 4 bytes.
    Long,
    /// 8 bytes.
    #[default]
    Quad,
}

impl MemWidth {
    /// Access size in bytes.
    #[inline]
    pub const fn bytes(self) -> u64 {
        match self {
            Self::Byte => 1,
            Self::Word => 2,
            Self::Long => 4,
            Self::Quad => 8,
        }
    }
}

/// Load instructions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOp {
    /// Zero-extended byte.
    Ldbu,
    /// Zero-extended word.
    Ldwu,
    /// Sign-extended longword.
    Ldl,
    /// Quadword.
    Ldq,
    /// Quadword at the address with bits 2:0 cleared.
    LdqU,
    /// S_floating, expanded to register format.
    Lds,
    /// T_floating.
    Ldt,
    /// Longword, setting the lock flag.
    LdlL,
    /// Quadword, setting the lock flag.
    LdqL,
}

impl LoadOp {
    /// Width of the memory access.
    pub const fn width(self) -> MemWidth {
        match self {
            Self::Ldbu => MemWidth::Byte,
            Self::Ldwu => MemWidth::Word,
            Self::Ldl | Self::Lds | Self::LdlL => MemWidth::Long,
            Self::Ldq | Self::LdqU | Self::Ldt | Self::LdqL => MemWidth::Quad,
        }
    }

    /// True if the destination is an FP register.
    pub const fn is_fp(self) -> bool {
        matches!(self, Self::Lds | Self::Ldt)
    }

    /// True for LDx_L.
    pub const fn is_locked(self) -> bool {
        matches!(self, Self::LdlL | Self::LdqL)
    }
}

/// Store instructions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreOp {
    /// Byte.
    Stb,
    /// Word.
    Stw,
    /// Longword.
    Stl,
    /// Quadword.
    Stq,
    /// Quadword at the address with bits 2:0 cleared.
    StqU,
    /// S_floating, compressed to memory format.
    Sts,
    /// T_floating.
    Stt,
    /// Longword, only if the lock flag is set.
    StlC,
    /// Quadword, only if the lock flag is set.
    StqC,
}

impl StoreOp {
    /// Width of the memory access.
    pub const fn width(self) -> MemWidth {
        match self {
            Self::Stb => MemWidth::Byte,
            Self::Stw => MemWidth::Word,
            Self::Stl | Self::Sts | Self::StlC => MemWidth::Long,
            Self::Stq | Self::StqU | Self::Stt | Self::StqC => MemWidth::Quad,
        }
    }

    /// True if the data comes from an FP register.
    pub const fn is_fp(self) -> bool {
        matches!(self, Self::Sts | Self::Stt)
    }

    /// True for STx_C.
    pub const fn is_conditional(self) -> bool {
        matches!(self, Self::StlC | Self::StqC)
    }
}

/// Computed jump kinds; they differ only in prediction hints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JumpKind {
    /// JMP.
    Jmp,
    /// JSR: pushes the return address stack.
    Jsr,
    /// RET: pops the return address stack.
    Ret,
    /// JSR_COROUTINE: pops then pushes.
    JsrCoroutine,
}

/// Control-flow operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchOp {
    /// Unconditional PC-relative branch, link in Ra.
    Br,
    /// Branch to subroutine, link in Ra.
    Bsr,
    /// Conditional branch on an integer register.
    Int(Cond),
    /// Conditional branch on an FP register.
    Fp(Cond),
    /// Computed jump to Rb, link in Ra.
    Jump(JumpKind),
}

impl BranchOp {
    /// True for branches whose direction must be predicted.
    pub const fn is_conditional(self) -> bool {
        matches!(self, Self::Int(_) | Self::Fp(_))
    }
}

/// Barrier flavors of the miscellaneous group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Barrier {
    /// TRAPB.
    Trap,
    /// EXCB.
    Exception,
    /// MB.
    Memory,
    /// WMB.
    WriteMemory,
}

/// System operations, all executed at the head of the reorder buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SystemOp {
    /// Enter PALcode.
    CallPal(u32),
    /// Ordering barrier.
    Barrier(Barrier),
    /// Read the cycle counter.
    Rpcc,
    /// Read and clear the interrupt flag.
    Rc,
    /// Read and set the interrupt flag.
    Rs,
    /// Write the FPCR from Fa.
    MtFpcr,
    /// Read the FPCR into Fa.
    MfFpcr,
    /// Read an internal processor register.
    HwMfpr(u8),
    /// Write an internal processor register from Rb.
    HwMtpr(u8),
    /// Return from PALcode to Rb.
    HwRet,
}

/// The closed set of operation classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Integer operate.
    Int(IntOp),
    /// Floating operate.
    Float(FpOp),
    /// Memory load.
    Load(LoadOp),
    /// Memory store.
    Store(StoreOp),
    /// Branch or jump.
    Branch(BranchOp),
    /// System or PAL operation.
    System(SystemOp),
    /// No architectural effect (UNOP, hints, prefetches, writes to R31/F31).
    Nop,
}

impl Operation {
    /// Functional unit that executes this operation.
    pub const fn unit(self) -> FuTarget {
        match self {
            Self::Int(IntOp::Ftoit | IntOp::Ftois)
            | Self::Float(_)
            | Self::Branch(BranchOp::Fp(_)) => FuTarget::Fbox,
            Self::Load(_) | Self::Store(_) => FuTarget::Mbox,
            Self::Int(_) | Self::Branch(_) | Self::System(_) | Self::Nop => FuTarget::Ebox,
        }
    }

    /// True if the operation may only execute at the head of the reorder buffer.
    pub const fn is_serializing(self) -> bool {
        match self {
            Self::System(_) => true,
            Self::Store(op) => op.is_conditional(),
            _ => false,
        }
    }

    /// True if younger instructions must be refetched after this one retires,
    /// because it changes state they read during execution.
    pub const fn refetches_after_retire(self) -> bool {
        matches!(
            self,
            Self::System(
                SystemOp::CallPal(_) | SystemOp::MtFpcr | SystemOp::HwMtpr(_) | SystemOp::HwRet
            )
        )
    }

    /// True for control transfers that need a rename checkpoint.
    pub const fn needs_checkpoint(self) -> bool {
        matches!(self, Self::Branch(_))
    }
}
