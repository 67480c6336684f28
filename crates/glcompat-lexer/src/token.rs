//! Token definitions for the shading language

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]                 // Skip whitespace
#[logos(skip r"//[^\n]*")]                      // Skip line comments
#[logos(skip r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]  // Skip block comments
pub enum TokenKind {
    // === Preprocessor ===
    // The whole line is one token; directives are carried through verbatim.
    #[regex(r"#[^\n]*")]
    Directive,

    // === Storage qualifiers ===
    #[token("const")]
    Const,
    #[token("in")]
    In,
    #[token("out")]
    Out,
    #[token("inout")]
    InOut,
    #[token("attribute")]
    Attribute,
    #[token("uniform")]
    Uniform,
    #[token("varying")]
    Varying,
    #[token("layout")]
    Layout,
    #[token("invariant")]
    Invariant,
    #[token("flat")]
    Flat,
    #[token("smooth")]
    Smooth,
    #[token("highp")]
    HighP,
    #[token("mediump")]
    MediumP,
    #[token("lowp")]
    LowP,
    #[token("precision")]
    Precision,
    #[token("struct")]
    Struct,

    // === Control flow ===
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("while")]
    While,
    #[token("do")]
    Do,
    #[token("switch")]
    Switch,
    #[token("case")]
    Case,
    #[token("default")]
    Default,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("return")]
    Return,
    #[token("discard")]
    Discard,

    // Literals
    #[token("true")]
    True,
    #[token("false")]
    False,

    // === Operators ===
    #[token("=")]
    Eq,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("<<=")]
    ShlEq,
    #[token(">>=")]
    ShrEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,

    #[token("==")]
    EqEq,
    #[token("!=")]
    Ne,
    #[token("<")]
    Lt,
    #[token("<=")]
    Le,
    #[token(">")]
    Gt,
    #[token(">=")]
    Ge,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,

    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,

    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("^^")]
    CaretCaret,
    #[token("!")]
    Bang,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    // === Punctuation ===
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
    #[token("?")]
    Question,

    // === Literals ===
    #[regex(r"0[xX][0-9a-fA-F]+[uU]?")]
    #[regex(r"[0-9]+[uU]?")]
    Int,

    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?([fF]|lf|LF)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?([fF]|lf|LF)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+([fF]|lf|LF)?")]
    Float,

    // === Identifiers ===
    // Type names (`vec4`, `sampler2D`) and contextual qualifiers (`sample`,
    // `patch`, ...) are identifiers; the parser classifies them.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    // === Special ===
    Error,
    Eof,
}

impl TokenKind {
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Const
                | TokenKind::In
                | TokenKind::Out
                | TokenKind::InOut
                | TokenKind::Attribute
                | TokenKind::Uniform
                | TokenKind::Varying
                | TokenKind::Layout
                | TokenKind::Invariant
                | TokenKind::Flat
                | TokenKind::Smooth
                | TokenKind::HighP
                | TokenKind::MediumP
                | TokenKind::LowP
                | TokenKind::Precision
                | TokenKind::Struct
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::For
                | TokenKind::While
                | TokenKind::Do
                | TokenKind::Switch
                | TokenKind::Case
                | TokenKind::Default
                | TokenKind::Break
                | TokenKind::Continue
                | TokenKind::Return
                | TokenKind::Discard
                | TokenKind::True
                | TokenKind::False
        )
    }

    /// Tokens that can only start a qualifier list
    pub fn is_qualifier(&self) -> bool {
        matches!(
            self,
            TokenKind::Const
                | TokenKind::In
                | TokenKind::Out
                | TokenKind::InOut
                | TokenKind::Attribute
                | TokenKind::Uniform
                | TokenKind::Varying
                | TokenKind::Layout
                | TokenKind::Invariant
                | TokenKind::Flat
                | TokenKind::Smooth
                | TokenKind::HighP
                | TokenKind::MediumP
                | TokenKind::LowP
        )
    }

    /// Assignment operators, including compound ones
    pub fn is_assignment(&self) -> bool {
        matches!(
            self,
            TokenKind::Eq
                | TokenKind::PlusEq
                | TokenKind::MinusEq
                | TokenKind::StarEq
                | TokenKind::SlashEq
                | TokenKind::PercentEq
                | TokenKind::ShlEq
                | TokenKind::ShrEq
                | TokenKind::AmpEq
                | TokenKind::PipeEq
                | TokenKind::CaretEq
        )
    }

    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Directive => "preprocessor directive",
            TokenKind::Const => "'const'",
            TokenKind::In => "'in'",
            TokenKind::Out => "'out'",
            TokenKind::InOut => "'inout'",
            TokenKind::Attribute => "'attribute'",
            TokenKind::Uniform => "'uniform'",
            TokenKind::Varying => "'varying'",
            TokenKind::Layout => "'layout'",
            TokenKind::Invariant => "'invariant'",
            TokenKind::Flat => "'flat'",
            TokenKind::Smooth => "'smooth'",
            TokenKind::HighP => "'highp'",
            TokenKind::MediumP => "'mediump'",
            TokenKind::LowP => "'lowp'",
            TokenKind::Precision => "'precision'",
            TokenKind::Struct => "'struct'",
            TokenKind::If => "'if'",
            TokenKind::Else => "'else'",
            TokenKind::For => "'for'",
            TokenKind::While => "'while'",
            TokenKind::Do => "'do'",
            TokenKind::Switch => "'switch'",
            TokenKind::Case => "'case'",
            TokenKind::Default => "'default'",
            TokenKind::Break => "'break'",
            TokenKind::Continue => "'continue'",
            TokenKind::Return => "'return'",
            TokenKind::Discard => "'discard'",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",
            TokenKind::Eq => "'='",
            TokenKind::PlusEq => "'+='",
            TokenKind::MinusEq => "'-='",
            TokenKind::StarEq => "'*='",
            TokenKind::SlashEq => "'/='",
            TokenKind::PercentEq => "'%='",
            TokenKind::ShlEq => "'<<='",
            TokenKind::ShrEq => "'>>='",
            TokenKind::AmpEq => "'&='",
            TokenKind::PipeEq => "'|='",
            TokenKind::CaretEq => "'^='",
            TokenKind::EqEq => "'=='",
            TokenKind::Ne => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::Le => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::Ge => "'>='",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::PlusPlus => "'++'",
            TokenKind::MinusMinus => "'--'",
            TokenKind::Shl => "'<<'",
            TokenKind::Shr => "'>>'",
            TokenKind::Amp => "'&'",
            TokenKind::Pipe => "'|'",
            TokenKind::Caret => "'^'",
            TokenKind::Tilde => "'~'",
            TokenKind::AndAnd => "'&&'",
            TokenKind::OrOr => "'||'",
            TokenKind::CaretCaret => "'^^'",
            TokenKind::Bang => "'!'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
            TokenKind::Semicolon => "';'",
            TokenKind::Dot => "'.'",
            TokenKind::Question => "'?'",
            TokenKind::Int => "integer",
            TokenKind::Float => "float",
            TokenKind::Ident => "identifier",
            TokenKind::Error => "error",
            TokenKind::Eof => "end of file",
        }
    }
}
