mod analyzer;

pub use analyzer::LiveVariableAnalyzer;
