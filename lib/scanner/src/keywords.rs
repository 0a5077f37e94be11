use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::token::TokenData::{self, *};

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenData<'static>> = HashMap::from([
        ("and", And),
        ("class", Class),
        ("else", Else),
        ("false", False),
        ("for", For),
        ("fun", Fun),
        ("if", If),
        ("nil", Nil),
        ("or", Or),
        ("print", Print),
        ("return", Return),
        ("super", Super),
        ("this", This),
        ("true", True),
        ("var", Var),
        ("while", While),
    ]);
}

/// Resolves an identifier spelling to its keyword, if it is reserved.
pub fn keyword(spelling: &str) -> Option<TokenData<'static>> {
    KEYWORDS.get(spelling).cloned()
}
