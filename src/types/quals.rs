//! Type qualifiers.
//!
//! Every Sable type can carry a small set of qualifiers describing how the
//! value is bound: constant or mutable, stack or shared, value or
//! reference. Only a handful of combinations make sense at the language
//! level; everything else is rejected up front.

bitflags! {
    /// A set of type qualifiers.
    pub struct QualSet: u8 {
        /// Constant; the binding cannot be reassigned.
        const CST = 0b00_0001;
        /// Mutable.
        const MUT = 0b00_0010;
        /// Stack-allocated.
        const STK = 0b00_0100;
        /// Shared (heap) allocation.
        const SHD = 0b00_1000;
        /// Value semantics.
        const VAL = 0b01_0000;
        /// Reference semantics.
        const REF = 0b10_0000;
    }
}

/// The qualifier combinations the language accepts.
pub const VALID_COMBINATIONS: [QualSet; 5] = [
    QualSet { bits: 0b01_0101 }, // cst stk val
    QualSet { bits: 0b10_0101 }, // cst stk ref
    QualSet { bits: 0b01_0110 }, // mut stk val
    QualSet { bits: 0b10_0110 }, // mut stk ref
    QualSet { bits: 0b01_1010 }, // mut shd val
];

impl QualSet {
    /// The qualifiers of a literal value: `cst stk val`.
    pub fn literal() -> QualSet {
        QualSet::CST | QualSet::STK | QualSet::VAL
    }

    /// Whether this exact set is one the language accepts.
    pub fn is_valid_combination(&self) -> bool {
        VALID_COMBINATIONS.contains(self)
    }

    /// Render as source syntax, e.g. `cst stk val`.
    pub fn describe(&self) -> String {
        let mut names = Vec::new();
        if self.contains(QualSet::CST) { names.push("cst"); }
        if self.contains(QualSet::MUT) { names.push("mut"); }
        if self.contains(QualSet::STK) { names.push("stk"); }
        if self.contains(QualSet::SHD) { names.push("shd"); }
        if self.contains(QualSet::VAL) { names.push("val"); }
        if self.contains(QualSet::REF) { names.push("ref"); }
        names.join(" ")
    }
}
