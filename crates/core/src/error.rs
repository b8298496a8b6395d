use std::fmt;

/// Why a single provider request produced no usable payload.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchFailure {
    Transport(String),
    Status { status: u16, body: String },
    Decode(String),
    Provider(String),
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(detail) => write!(f, "request failed: {detail}"),
            Self::Status { status, body } => write!(f, "HTTP {status}: {body}"),
            Self::Decode(detail) => write!(f, "unexpected response shape: {detail}"),
            Self::Provider(message) => write!(f, "provider error: {message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnavailableReason {
    Fetch(FetchFailure),
    EmptyPayload,
    MissingField(&'static str),
    NonPositivePrice(f64),
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(failure) => failure.fmt(f),
            Self::EmptyPayload => f.write_str("no data returned"),
            Self::MissingField(field) => write!(f, "quote is missing `{field}`"),
            Self::NonPositivePrice(price) => write!(f, "quote price must be positive (got {price})"),
        }
    }
}

/// The quote could not be obtained. Fatal for the evaluation: nothing can be scored without a
/// current price.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteUnavailable {
    pub ticker: String,
    pub reason: UnavailableReason,
}

impl fmt::Display for QuoteUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "quote unavailable for {}: {}", self.ticker, self.reason)
    }
}

impl std::error::Error for QuoteUnavailable {}

#[derive(Debug, Clone, PartialEq)]
pub enum InsufficientReason {
    Fetch(FetchFailure),
    TooFewPeriods(usize),
    MissingField(&'static str),
}

impl fmt::Display for InsufficientReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(failure) => failure.fmt(f),
            Self::TooFewPeriods(n) => write!(f, "need 2 income statements, got {n}"),
            Self::MissingField(field) => write!(f, "income statement is missing `{field}`"),
        }
    }
}

/// Fundamentals could not be paired up. Not fatal: scoring falls back to the neutral score.
#[derive(Debug, Clone, PartialEq)]
pub struct FundamentalsInsufficient {
    pub ticker: String,
    pub reason: InsufficientReason,
}

impl fmt::Display for FundamentalsInsufficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "insufficient fundamentals for {}: {}",
            self.ticker, self.reason
        )
    }
}

impl std::error::Error for FundamentalsInsufficient {}

#[derive(Debug, Clone, PartialEq)]
pub enum InvalidUserInput {
    EmptyTicker,
    MalformedTicker(String),
    NotANumber { field: &'static str, input: String },
    NotFinite { field: &'static str, input: String },
    Missing { field: &'static str },
}

impl fmt::Display for InvalidUserInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTicker => f.write_str("ticker symbol must be non-empty"),
            Self::MalformedTicker(input) => {
                write!(
                    f,
                    "ticker symbol may only contain letters, digits, '.', '-' or '^' (got {input:?})"
                )
            }
            Self::NotANumber { field, input } => {
                write!(f, "invalid input for {field}: {input:?} is not a number")
            }
            Self::NotFinite { field, input } => {
                write!(f, "invalid input for {field}: {input:?} is not a finite price")
            }
            Self::Missing { field } => write!(f, "no input given for {field}"),
        }
    }
}

impl std::error::Error for InvalidUserInput {}
