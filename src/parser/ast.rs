//! Syntax tree for helper calls inside a placeholder

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// A node with its source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// A helper invocation: `name(argument)`
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub name: Spanned<String>,
    pub argument: Argument,
    /// Span of the whole call, from the name to the closing parenthesis
    pub span: Span,
}

/// What sits between the parentheses of a call
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// `name()`
    Empty,
    /// Raw scalar text, trimmed of surrounding whitespace
    Literal(Spanned<String>),
    /// Another call whose result becomes the argument
    Call(Box<Call>),
}

impl Call {
    /// All calls of the chain, outermost first
    ///
    /// Evaluating the returned list in reverse order resolves the
    /// innermost call first.
    pub fn chain(&self) -> Vec<&Call> {
        let mut chain = vec![self];
        let mut current = self;
        while let Argument::Call(inner) = &current.argument {
            chain.push(inner);
            current = inner;
        }
        chain
    }

    /// Nesting depth, 1 for a call without an inner call
    pub fn depth(&self) -> usize {
        self.chain().len()
    }

    /// The call with no nested call in its argument
    pub fn innermost(&self) -> &Call {
        let mut current = self;
        while let Argument::Call(inner) = &current.argument {
            current = inner;
        }
        current
    }

    pub fn name(&self) -> &str {
        &self.name.node
    }
}
