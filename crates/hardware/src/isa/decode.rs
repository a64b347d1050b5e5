//! Alpha Instruction Decoder.
//!
//! This module turns a 32-bit instruction word into a [`Decoded`] descriptor. It performs:
//! 1. **Format Selection:** PAL, memory, memory-with-function, branch, integer operate, FP operate
//!    and the PAL-mode hardware formats are chosen by the primary opcode.
//! 2. **Operand Extraction:** Register roles are fixed per slot and immediates are sign-extended
//!    and scaled, so later stages never look at the raw encoding.
//! 3. **Subset Checking:** Unimplemented opcodes, reserved function codes and illegal qualifier
//!    combinations decode to `IllegalInstruction`.
//! 4. **No-op Folding:** Non-trapping operates and prefetching loads that target R31/F31
//!    become [`Operation::Nop`].
//!
//! Decoding is pure: it never looks at processor mode. PAL-only and privileged
//! instructions are rejected at dispatch.

use crate::common::error::TrapKind;
use crate::common::reg::ArchReg;
use crate::core::pipeline::signals::{
    Barrier, BranchOp, ByteWidth, Cond, FpArith, FpCompare, FpFormat, FpOp, FpQualifiers, Half,
    IntOp, JumpKind, LoadOp, MinMax, Operation, StoreOp, SystemOp,
};
use crate::isa::functions::{fltl, flti, fpti, inta, intl, ints, intm, itfp, jump, misc};
use crate::isa::instruction::{Decoded, InstructionBits, OperandB};
use crate::isa::opcodes;
use crate::isa::pal;

/// Low six bits of an FP function field: the operation without qualifiers.
const FP_OP_MASK: u32 = 0x3F;

/// Trap-qualifier field of an FP function (bits 10:8 of the function).
const fn trap_bits(func: u32) -> u32 {
    (func >> 8) & 0x7
}

/// Trap qualifiers accepted by IEEE arithmetic, square root, CVTTS and CVTTQ:
/// none, /U (/V), /SU (/SV), /SUI (/SVI).
const fn arith_trap_ok(func: u32) -> bool {
    matches!(trap_bits(func), 0b000 | 0b001 | 0b101 | 0b111)
}

/// Trap qualifiers accepted by CVTQS and CVTQT: none or /SUI.
const fn int_to_fp_trap_ok(func: u32) -> bool {
    matches!(trap_bits(func), 0b000 | 0b111)
}

/// Decodes one instruction word.
///
/// Returns `TrapKind::IllegalInstruction` for every word outside the
/// implemented subset. Decoding the same word twice yields equal results.
pub fn decode(word: u32) -> Result<Decoded, TrapKind> {
    let illegal = TrapKind::IllegalInstruction { word };
    let d = Decoded::blank(word);

    let decoded = match word.opcode() {
        opcodes::OP_CALL_PAL => {
            let function = word.pal_func();
            if pal::classify(function).is_none() {
                return Err(illegal);
            }
            d.with_op(Operation::System(SystemOp::CallPal(function)))
        }

        opcodes::OP_LDA | opcodes::OP_LDAH => {
            let (op, disp) = if word.opcode() == opcodes::OP_LDA {
                (IntOp::Lda, word.mem_disp())
            } else {
                (IntOp::Ldah, word.mem_disp() << 16)
            };
            let dest = ArchReg::int(word.ra());
            Decoded {
                op: Operation::Int(op),
                dest: dest.unless_zero(),
                b: OperandB::Reg(ArchReg::int(word.rb())),
                disp,
                ..d
            }
            .nop_if_discarded()
        }

        opcodes::OP_LDBU => int_load(d, word, LoadOp::Ldbu, false),
        opcodes::OP_LDWU => int_load(d, word, LoadOp::Ldwu, false),
        opcodes::OP_LDQ_U => int_load(d, word, LoadOp::LdqU, true),
        opcodes::OP_LDL => int_load(d, word, LoadOp::Ldl, true),
        opcodes::OP_LDQ => int_load(d, word, LoadOp::Ldq, true),
        opcodes::OP_LDL_L => int_load(d, word, LoadOp::LdlL, false),
        opcodes::OP_LDQ_L => int_load(d, word, LoadOp::LdqL, false),
        opcodes::OP_LDS => fp_load(d, word, LoadOp::Lds),
        opcodes::OP_LDT => fp_load(d, word, LoadOp::Ldt),

        opcodes::OP_STB => store(d, word, StoreOp::Stb),
        opcodes::OP_STW => store(d, word, StoreOp::Stw),
        opcodes::OP_STQ_U => store(d, word, StoreOp::StqU),
        opcodes::OP_STL => store(d, word, StoreOp::Stl),
        opcodes::OP_STQ => store(d, word, StoreOp::Stq),
        opcodes::OP_STS => store(d, word, StoreOp::Sts),
        opcodes::OP_STT => store(d, word, StoreOp::Stt),
        opcodes::OP_STL_C | opcodes::OP_STQ_C => {
            let op = if word.opcode() == opcodes::OP_STL_C {
                StoreOp::StlC
            } else {
                StoreOp::StqC
            };
            let ra = ArchReg::int(word.ra());
            Decoded {
                dest: ra.unless_zero(),
                ..store(d, word, op)
            }
        }

        opcodes::OP_INTA => int_operate(d, word, decode_inta(word.int_func()).ok_or(illegal)?),
        opcodes::OP_INTL => decode_intl(d, word).ok_or(illegal)?,
        opcodes::OP_INTS => int_operate(d, word, decode_ints(word.int_func()).ok_or(illegal)?),
        opcodes::OP_INTM => int_operate(d, word, decode_intm(word.int_func()).ok_or(illegal)?),
        opcodes::OP_FPTI => decode_fpti(d, word).ok_or(illegal)?,

        opcodes::OP_ITFP => decode_itfp(d, word).ok_or(illegal)?,
        opcodes::OP_FLTI => decode_flti(d, word).ok_or(illegal)?,
        opcodes::OP_FLTL => decode_fltl(d, word).ok_or(illegal)?,

        opcodes::OP_MISC => decode_misc(d, word).ok_or(illegal)?,

        opcodes::OP_JSR => {
            let kind = match word.jump_kind() {
                jump::JMP => JumpKind::Jmp,
                jump::JSR => JumpKind::Jsr,
                jump::RET => JumpKind::Ret,
                _ => JumpKind::JsrCoroutine,
            };
            Decoded {
                op: Operation::Branch(BranchOp::Jump(kind)),
                dest: ArchReg::int(word.ra()).unless_zero(),
                b: OperandB::Reg(ArchReg::int(word.rb())),
                ..d
            }
        }

        opcodes::OP_BR | opcodes::OP_BSR => {
            let op = if word.opcode() == opcodes::OP_BR {
                BranchOp::Br
            } else {
                BranchOp::Bsr
            };
            Decoded {
                op: Operation::Branch(op),
                dest: ArchReg::int(word.ra()).unless_zero(),
                disp: word.branch_disp() * 4,
                ..d
            }
        }

        opcodes::OP_FBEQ => cond_branch(d, word, Cond::Eq, true),
        opcodes::OP_FBLT => cond_branch(d, word, Cond::Lt, true),
        opcodes::OP_FBLE => cond_branch(d, word, Cond::Le, true),
        opcodes::OP_FBNE => cond_branch(d, word, Cond::Ne, true),
        opcodes::OP_FBGE => cond_branch(d, word, Cond::Ge, true),
        opcodes::OP_FBGT => cond_branch(d, word, Cond::Gt, true),
        opcodes::OP_BLBC => cond_branch(d, word, Cond::Lbc, false),
        opcodes::OP_BEQ => cond_branch(d, word, Cond::Eq, false),
        opcodes::OP_BLT => cond_branch(d, word, Cond::Lt, false),
        opcodes::OP_BLE => cond_branch(d, word, Cond::Le, false),
        opcodes::OP_BLBS => cond_branch(d, word, Cond::Lbs, false),
        opcodes::OP_BNE => cond_branch(d, word, Cond::Ne, false),
        opcodes::OP_BGE => cond_branch(d, word, Cond::Ge, false),
        opcodes::OP_BGT => cond_branch(d, word, Cond::Gt, false),

        opcodes::OP_HW_MFPR => Decoded {
            op: Operation::System(SystemOp::HwMfpr(word.ipr_index())),
            dest: ArchReg::int(word.ra()).unless_zero(),
            pal_only: true,
            ..d
        },
        opcodes::OP_HW_MTPR => Decoded {
            op: Operation::System(SystemOp::HwMtpr(word.ipr_index())),
            b: OperandB::Reg(ArchReg::int(word.rb())),
            pal_only: true,
            ..d
        },
        opcodes::OP_HW_RET => Decoded {
            op: Operation::System(SystemOp::HwRet),
            b: OperandB::Reg(ArchReg::int(word.rb())),
            pal_only: true,
            ..d
        },
        opcodes::OP_HW_LD => {
            let op = if word.hw_quad() { LoadOp::Ldq } else { LoadOp::Ldl };
            Decoded {
                op: Operation::Load(op),
                dest: ArchReg::int(word.ra()).unless_zero(),
                b: OperandB::Reg(ArchReg::int(word.rb())),
                disp: word.hw_disp(),
                pal_only: true,
                ..d
            }
        }
        opcodes::OP_HW_ST => {
            let op = if word.hw_quad() { StoreOp::Stq } else { StoreOp::Stl };
            Decoded {
                op: Operation::Store(op),
                a: Some(ArchReg::int(word.ra())),
                b: OperandB::Reg(ArchReg::int(word.rb())),
                disp: word.hw_disp(),
                pal_only: true,
                ..d
            }
        }

        // Reserved opcodes 0x01-0x07 and VAX floating point.
        _ => return Err(illegal),
    };

    Ok(decoded)
}

impl Decoded {
    /// A no-op descriptor for `raw`, used as the base of every format and
    /// for instructions that fault before they can be decoded.
    pub const fn blank(raw: u32) -> Self {
        Self {
            raw,
            op: Operation::Nop,
            dest: None,
            a: None,
            b: OperandB::None,
            c: None,
            disp: 0,
            pal_only: false,
        }
    }

    const fn with_op(self, op: Operation) -> Self {
        Self { op, ..self }
    }

    /// Folds an instruction whose only effect is a register write into a
    /// no-op when that write goes to R31/F31.
    fn nop_if_discarded(self) -> Self {
        if self.dest.is_none() {
            Self::blank(self.raw)
        } else {
            self
        }
    }
}

fn int_load(d: Decoded, word: u32, op: LoadOp, prefetch_on_zero: bool) -> Decoded {
    let decoded = Decoded {
        op: Operation::Load(op),
        dest: ArchReg::int(word.ra()).unless_zero(),
        b: OperandB::Reg(ArchReg::int(word.rb())),
        disp: word.mem_disp(),
        ..d
    };
    if prefetch_on_zero {
        decoded.nop_if_discarded()
    } else {
        decoded
    }
}

fn fp_load(d: Decoded, word: u32, op: LoadOp) -> Decoded {
    Decoded {
        op: Operation::Load(op),
        dest: ArchReg::fp(word.ra()).unless_zero(),
        b: OperandB::Reg(ArchReg::int(word.rb())),
        disp: word.mem_disp(),
        ..d
    }
    .nop_if_discarded()
}

fn store(d: Decoded, word: u32, op: StoreOp) -> Decoded {
    let data = if op.is_fp() {
        ArchReg::fp(word.ra())
    } else {
        ArchReg::int(word.ra())
    };
    Decoded {
        op: Operation::Store(op),
        a: Some(data),
        b: OperandB::Reg(ArchReg::int(word.rb())),
        disp: word.mem_disp(),
        ..d
    }
}

fn cond_branch(d: Decoded, word: u32, cond: Cond, fp: bool) -> Decoded {
    let (op, a) = if fp {
        (BranchOp::Fp(cond), ArchReg::fp(word.ra()))
    } else {
        (BranchOp::Int(cond), ArchReg::int(word.ra()))
    };
    Decoded {
        op: Operation::Branch(op),
        a: Some(a),
        disp: word.branch_disp() * 4,
        ..d
    }
}

/// Operand B of an integer operate: the literal when bit 12 is set.
fn int_operand_b(word: u32) -> OperandB {
    if word.has_literal() {
        OperandB::Literal(word.literal())
    } else {
        OperandB::Reg(ArchReg::int(word.rb()))
    }
}

/// Standard two-source integer operate `Rc <- Ra op Rb`.
fn int_operate(d: Decoded, word: u32, op: IntOp) -> Decoded {
    let decoded = Decoded {
        op: Operation::Int(op),
        dest: ArchReg::int(word.rc()).unless_zero(),
        a: Some(ArchReg::int(word.ra())),
        b: int_operand_b(word),
        ..d
    };
    if op.can_trap() {
        decoded
    } else {
        decoded.nop_if_discarded()
    }
}

/// Operate that reads only operand B (`Rc <- op Rb`).
fn int_unary(d: Decoded, word: u32, op: IntOp) -> Decoded {
    Decoded {
        a: None,
        ..int_operate(d, word, op)
    }
}

fn decode_inta(func: u32) -> Option<IntOp> {
    let op = match func {
        inta::ADDL => IntOp::Addl,
        inta::S4ADDL => IntOp::ScaledAddl(4),
        inta::SUBL => IntOp::Subl,
        inta::S4SUBL => IntOp::ScaledSubl(4),
        inta::CMPBGE => IntOp::Cmpbge,
        inta::S8ADDL => IntOp::ScaledAddl(8),
        inta::S8SUBL => IntOp::ScaledSubl(8),
        inta::CMPULT => IntOp::Cmpult,
        inta::ADDQ => IntOp::Addq,
        inta::S4ADDQ => IntOp::ScaledAddq(4),
        inta::SUBQ => IntOp::Subq,
        inta::S4SUBQ => IntOp::ScaledSubq(4),
        inta::CMPEQ => IntOp::Cmpeq,
        inta::S8ADDQ => IntOp::ScaledAddq(8),
        inta::S8SUBQ => IntOp::ScaledSubq(8),
        inta::CMPULE => IntOp::Cmpule,
        inta::ADDL_V => IntOp::AddlV,
        inta::SUBL_V => IntOp::SublV,
        inta::CMPLT => IntOp::Cmplt,
        inta::ADDQ_V => IntOp::AddqV,
        inta::SUBQ_V => IntOp::SubqV,
        inta::CMPLE => IntOp::Cmple,
        _ => return None,
    };
    Some(op)
}

fn decode_intl(d: Decoded, word: u32) -> Option<Decoded> {
    let cmov = |cond| {
        let rc = ArchReg::int(word.rc());
        Decoded {
            c: Some(rc),
            ..int_operate(d, word, IntOp::Cmov(cond))
        }
        .nop_if_discarded()
    };
    let decoded = match word.int_func() {
        intl::AND => int_operate(d, word, IntOp::And),
        intl::BIC => int_operate(d, word, IntOp::Bic),
        intl::BIS => int_operate(d, word, IntOp::Bis),
        intl::ORNOT => int_operate(d, word, IntOp::Ornot),
        intl::XOR => int_operate(d, word, IntOp::Xor),
        intl::EQV => int_operate(d, word, IntOp::Eqv),
        intl::CMOVLBS => cmov(Cond::Lbs),
        intl::CMOVLBC => cmov(Cond::Lbc),
        intl::CMOVEQ => cmov(Cond::Eq),
        intl::CMOVNE => cmov(Cond::Ne),
        intl::CMOVLT => cmov(Cond::Lt),
        intl::CMOVGE => cmov(Cond::Ge),
        intl::CMOVLE => cmov(Cond::Le),
        intl::CMOVGT => cmov(Cond::Gt),
        intl::AMASK => int_unary(d, word, IntOp::Amask),
        intl::IMPLVER => Decoded {
            b: OperandB::None,
            ..int_unary(d, word, IntOp::Implver)
        },
        _ => return None,
    };
    Some(decoded)
}

fn decode_ints(func: u32) -> Option<IntOp> {
    use ByteWidth::{Byte, Long, Quad, Word};
    use Half::{High, Low};
    let op = match func {
        ints::MSKBL => IntOp::Msk(Byte, Low),
        ints::MSKWL => IntOp::Msk(Word, Low),
        ints::MSKLL => IntOp::Msk(Long, Low),
        ints::MSKQL => IntOp::Msk(Quad, Low),
        ints::MSKWH => IntOp::Msk(Word, High),
        ints::MSKLH => IntOp::Msk(Long, High),
        ints::MSKQH => IntOp::Msk(Quad, High),
        ints::EXTBL => IntOp::Ext(Byte, Low),
        ints::EXTWL => IntOp::Ext(Word, Low),
        ints::EXTLL => IntOp::Ext(Long, Low),
        ints::EXTQL => IntOp::Ext(Quad, Low),
        ints::EXTWH => IntOp::Ext(Word, High),
        ints::EXTLH => IntOp::Ext(Long, High),
        ints::EXTQH => IntOp::Ext(Quad, High),
        ints::INSBL => IntOp::Ins(Byte, Low),
        ints::INSWL => IntOp::Ins(Word, Low),
        ints::INSLL => IntOp::Ins(Long, Low),
        ints::INSQL => IntOp::Ins(Quad, Low),
        ints::INSWH => IntOp::Ins(Word, High),
        ints::INSLH => IntOp::Ins(Long, High),
        ints::INSQH => IntOp::Ins(Quad, High),
        ints::ZAP => IntOp::Zap,
        ints::ZAPNOT => IntOp::Zapnot,
        ints::SLL => IntOp::Sll,
        ints::SRL => IntOp::Srl,
        ints::SRA => IntOp::Sra,
        _ => return None,
    };
    Some(op)
}

fn decode_intm(func: u32) -> Option<IntOp> {
    let op = match func {
        intm::MULL => IntOp::Mull,
        intm::MULQ => IntOp::Mulq,
        intm::UMULH => IntOp::Umulh,
        intm::MULL_V => IntOp::MullV,
        intm::MULQ_V => IntOp::MulqV,
        _ => return None,
    };
    Some(op)
}

fn decode_fpti(d: Decoded, word: u32) -> Option<Decoded> {
    let decoded = match word.int_func() {
        fpti::SEXTB => int_unary(d, word, IntOp::Sextb),
        fpti::SEXTW => int_unary(d, word, IntOp::Sextw),
        fpti::CTPOP => int_unary(d, word, IntOp::Ctpop),
        fpti::CTLZ => int_unary(d, word, IntOp::Ctlz),
        fpti::CTTZ => int_unary(d, word, IntOp::Cttz),
        fpti::UNPKBW => int_unary(d, word, IntOp::Unpkbw),
        fpti::UNPKBL => int_unary(d, word, IntOp::Unpkbl),
        fpti::PKWB => int_unary(d, word, IntOp::Pkwb),
        fpti::PKLB => int_unary(d, word, IntOp::Pklb),
        fpti::PERR => int_operate(d, word, IntOp::Perr),
        fpti::MINSB8 => int_operate(d, word, IntOp::MinMax(MinMax::Minsb8)),
        fpti::MINSW4 => int_operate(d, word, IntOp::MinMax(MinMax::Minsw4)),
        fpti::MINUB8 => int_operate(d, word, IntOp::MinMax(MinMax::Minub8)),
        fpti::MINUW4 => int_operate(d, word, IntOp::MinMax(MinMax::Minuw4)),
        fpti::MAXUB8 => int_operate(d, word, IntOp::MinMax(MinMax::Maxub8)),
        fpti::MAXUW4 => int_operate(d, word, IntOp::MinMax(MinMax::Maxuw4)),
        fpti::MAXSB8 => int_operate(d, word, IntOp::MinMax(MinMax::Maxsb8)),
        fpti::MAXSW4 => int_operate(d, word, IntOp::MinMax(MinMax::Maxsw4)),
        fpti::FTOIT | fpti::FTOIS => {
            let op = if word.int_func() == fpti::FTOIT {
                IntOp::Ftoit
            } else {
                IntOp::Ftois
            };
            Decoded {
                op: Operation::Int(op),
                dest: ArchReg::int(word.rc()).unless_zero(),
                a: Some(ArchReg::fp(word.ra())),
                ..d
            }
            .nop_if_discarded()
        }
        _ => return None,
    };
    Some(decoded)
}

/// FP operate `Fc <- Fa op Fb`.
fn fp_operate(d: Decoded, word: u32, op: FpOp) -> Decoded {
    let decoded = Decoded {
        op: Operation::Float(op),
        dest: ArchReg::fp(word.rc()).unless_zero(),
        a: Some(ArchReg::fp(word.ra())),
        b: OperandB::Reg(ArchReg::fp(word.rb())),
        ..d
    };
    if op.can_trap() {
        decoded
    } else {
        decoded.nop_if_discarded()
    }
}

/// FP operate that reads only Fb.
fn fp_unary(d: Decoded, word: u32, op: FpOp) -> Decoded {
    Decoded {
        a: None,
        ..fp_operate(d, word, op)
    }
}

fn decode_itfp(d: Decoded, word: u32) -> Option<Decoded> {
    let func = word.fp_func();
    let itof = |op| {
        Decoded {
            op: Operation::Float(op),
            dest: ArchReg::fp(word.rc()).unless_zero(),
            a: Some(ArchReg::int(word.ra())),
            ..d
        }
        .nop_if_discarded()
    };
    let decoded = match func {
        itfp::ITOFS => itof(FpOp::Itofs),
        itfp::ITOFT => itof(FpOp::Itoft),
        _ if !arith_trap_ok(func) => return None,
        _ => {
            let q = FpQualifiers::from_func(func);
            match func & FP_OP_MASK {
                itfp::SQRTS => fp_unary(d, word, FpOp::Sqrt(FpFormat::S, q)),
                itfp::SQRTT => fp_unary(d, word, FpOp::Sqrt(FpFormat::T, q)),
                _ => return None,
            }
        }
    };
    Some(decoded)
}

fn decode_flti(d: Decoded, word: u32) -> Option<Decoded> {
    let func = word.fp_func();
    let q = FpQualifiers::from_func(func);

    // CVTST shares its low six bits with CVTTS and exists in two exact forms.
    if func == flti::CVTST || func == flti::CVTST_S {
        return Some(fp_unary(d, word, FpOp::Cvtst(q)));
    }

    let low = func & FP_OP_MASK;
    let arith = |kind, format| fp_operate(d, word, FpOp::Arith(kind, format, q));
    let decoded = match low {
        flti::ADDS..=flti::DIVS | flti::ADDT..=flti::DIVT if arith_trap_ok(func) => {
            let format = if low >= flti::ADDT { FpFormat::T } else { FpFormat::S };
            let kind = match low & 0x3 {
                0 => FpArith::Add,
                1 => FpArith::Sub,
                2 => FpArith::Mul,
                _ => FpArith::Div,
            };
            arith(kind, format)
        }
        flti::CMPTUN..=flti::CMPTLE if matches!(func, 0x0A4..=0x0A7 | 0x5A4..=0x5A7) => {
            let pred = match low {
                flti::CMPTUN => FpCompare::Un,
                flti::CMPTEQ => FpCompare::Eq,
                flti::CMPTLT => FpCompare::Lt,
                _ => FpCompare::Le,
            };
            fp_operate(d, word, FpOp::Compare(pred, q))
        }
        flti::CVTTS if arith_trap_ok(func) => fp_unary(d, word, FpOp::Cvtts(q)),
        flti::CVTTQ if arith_trap_ok(func) => fp_unary(d, word, FpOp::Cvttq(q)),
        flti::CVTQS if int_to_fp_trap_ok(func) => fp_unary(d, word, FpOp::Cvtqs(q)),
        flti::CVTQT if int_to_fp_trap_ok(func) => fp_unary(d, word, FpOp::Cvtqt(q)),
        _ => return None,
    };
    Some(decoded)
}

fn decode_fltl(d: Decoded, word: u32) -> Option<Decoded> {
    let func = word.fp_func();
    let fa = ArchReg::fp(word.ra());
    let fcmov = |cond| {
        Decoded {
            c: Some(ArchReg::fp(word.rc())),
            ..fp_operate(d, word, FpOp::Fcmov(cond))
        }
        .nop_if_discarded()
    };
    let decoded = match func {
        fltl::CVTLQ => fp_unary(d, word, FpOp::Cvtlq),
        fltl::CPYS => fp_operate(d, word, FpOp::Cpys),
        fltl::CPYSN => fp_operate(d, word, FpOp::Cpysn),
        fltl::CPYSE => fp_operate(d, word, FpOp::Cpyse),
        fltl::MT_FPCR => Decoded {
            op: Operation::System(SystemOp::MtFpcr),
            a: Some(fa),
            ..d
        },
        fltl::MF_FPCR => Decoded {
            op: Operation::System(SystemOp::MfFpcr),
            dest: fa.unless_zero(),
            ..d
        },
        fltl::FCMOVEQ => fcmov(Cond::Eq),
        fltl::FCMOVNE => fcmov(Cond::Ne),
        fltl::FCMOVLT => fcmov(Cond::Lt),
        fltl::FCMOVGE => fcmov(Cond::Ge),
        fltl::FCMOVLE => fcmov(Cond::Le),
        fltl::FCMOVGT => fcmov(Cond::Gt),
        fltl::CVTQL | fltl::CVTQL_V | fltl::CVTQL_SV => {
            fp_unary(d, word, FpOp::Cvtql(FpQualifiers::from_func(func)))
        }
        _ => return None,
    };
    Some(decoded)
}

fn decode_misc(d: Decoded, word: u32) -> Option<Decoded> {
    let ra = ArchReg::int(word.ra());
    let with_dest = |op| Decoded {
        op: Operation::System(op),
        dest: ra.unless_zero(),
        ..d
    };
    let decoded = match word.mem_func() {
        misc::TRAPB => d.with_op(Operation::System(SystemOp::Barrier(Barrier::Trap))),
        misc::EXCB => d.with_op(Operation::System(SystemOp::Barrier(Barrier::Exception))),
        misc::MB => d.with_op(Operation::System(SystemOp::Barrier(Barrier::Memory))),
        misc::WMB => d.with_op(Operation::System(SystemOp::Barrier(Barrier::WriteMemory))),
        misc::RPCC => with_dest(SystemOp::Rpcc),
        misc::RC => with_dest(SystemOp::Rc),
        misc::RS => with_dest(SystemOp::Rs),
        misc::FETCH | misc::FETCH_M | misc::ECB | misc::WH64 | misc::WH64EN => d,
        _ => return None,
    };
    Some(decoded)
}
