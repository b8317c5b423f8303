//! Binary, unary and assignment operators.

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    BitClear,
    Shl,
    Shr,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 19] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Mod,
        Self::Eq,
        Self::NotEq,
        Self::Lt,
        Self::LtEq,
        Self::Gt,
        Self::GtEq,
        Self::And,
        Self::Or,
        Self::BitAnd,
        Self::BitOr,
        Self::BitXor,
        Self::BitClear,
        Self::Shl,
        Self::Shr,
    ];

    /// Returns the source-level symbol for this operator.
    ///
    /// The symbol doubles as the operator's lookup name in the calculator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "&&",
            Self::Or => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::BitClear => "&^",
            Self::Shl => "<<",
            Self::Shr => ">>",
        }
    }

    /// Looks an operator up by its symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_symbol() == symbol)
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "-" => Some(Self::Neg),
            "!" => Some(Self::Not),
            _ => None,
        }
    }
}

/// Assignment flavours.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AssignOp {
    /// `=`: update the nearest binding, declaring locally if none exists.
    Set,
    /// `:=`: always declare in the current scope.
    Declare,
    /// `+=`, `-=`, ...: read, apply, store.
    Compound(BinaryOp),
}

impl AssignOp {
    pub fn as_symbol(self) -> String {
        match self {
            Self::Set => "=".to_string(),
            Self::Declare => ":=".to_string(),
            Self::Compound(op) => format!("{}=", op.as_symbol()),
        }
    }
}
