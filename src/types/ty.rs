//! The type lattice.

use smallvec::SmallVec;

use scope::{ScopeId, SymbolId};
use types::QualSet;

/// Identifies a type within a `CompilerContext`.
///
/// Non-variable types are interned, so two structurally equal types always
/// share one `TypeId` and id equality is semantic equality.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// The builtin types seeded into the root scope.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum BuiltinName {
    Bool,
    Int,
    Float,
    String,
    /// The top type; every type conforms to it.
    Anything,
    /// The bottom type, also the codomain of value-less functions.
    Nothing,
}

impl BuiltinName {
    pub fn name(&self) -> &'static str {
        match *self {
            BuiltinName::Bool => "Bool",
            BuiltinName::Int => "Int",
            BuiltinName::Float => "Float",
            BuiltinName::String => "String",
            BuiltinName::Anything => "Anything",
            BuiltinName::Nothing => "Nothing",
        }
    }

    pub fn all() -> [BuiltinName; 6] {
        [BuiltinName::Bool, BuiltinName::Int, BuiltinName::Float,
         BuiltinName::String, BuiltinName::Anything, BuiltinName::Nothing]
    }
}

/// What kind of aggregate a nominal type declares.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum NominalKind {
    Struct,
    Interface,
    Union,
}

/// A user-declared nominal type.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct NominalTy {
    pub kind: NominalKind,
    pub name: String,
    /// The symbol the type declaration introduced.
    pub symbol: SymbolId,
    /// The scope its members are declared in.
    pub scope: ScopeId,
    /// The placeholder types of its generic parameters, in declaration order.
    pub placeholders: SmallVec<[TypeId; 2]>,
}

/// A function or method signature.
///
/// Methods are curried: the declared signature sits inside an outer
/// single-parameter function over `Self`.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct FunctionTy {
    /// Parameters as (label, type) pairs; arguments match by label.
    pub params: SmallVec<[(Option<String>, TypeId); 4]>,
    pub codomain: TypeId,
    /// Placeholders this function itself declares.
    pub placeholders: SmallVec<[TypeId; 2]>,
}

/// The closed sum of semantic types.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum Ty {
    /// The type of ill-typed nodes. Absorbs constraints without cascading.
    Error,
    /// A builtin type, with the member scope its operators live in.
    Builtin { name: BuiltinName, scope: ScopeId },
    /// An unknown discovered during inference; the only substitutable type.
    Variable(u32),
    /// A generic parameter awaiting instantiation.
    Placeholder { name: String, owner: SymbolId },
    Nominal(NominalTy),
    Function(FunctionTy),
    /// A generic type under a (possibly partial) specialization.
    /// Bindings map placeholder ids to type ids, sorted by placeholder.
    BoundGeneric { base: TypeId, bindings: Vec<(TypeId, TypeId)> },
    /// A nominal mid-inference: placeholders mapped to fresh variables,
    /// awaiting closure. Preserves nominal identity through unification.
    OpenedNominal { base: TypeId, bindings: Vec<(TypeId, TypeId)> },
    /// The type of a type.
    Metatype(TypeId),
    /// A qualified type; `base` is never itself `Qualified`.
    Qualified { quals: QualSet, base: TypeId },
}

impl Ty {
    pub fn is_error(&self) -> bool {
        match *self {
            Ty::Error => true,
            _ => false,
        }
    }

    pub fn is_variable(&self) -> bool {
        match *self {
            Ty::Variable(_) => true,
            _ => false,
        }
    }

    pub fn is_function(&self) -> bool {
        match *self {
            Ty::Function(_) => true,
            _ => false,
        }
    }

    pub fn is_metatype(&self) -> bool {
        match *self {
            Ty::Metatype(_) => true,
            _ => false,
        }
    }
}
