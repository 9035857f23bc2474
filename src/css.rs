//! CSS front-end: turns stylesheet text into the string-level rule model the
//! apply engine consumes.
//!
//! This is deliberately not a typed property system. The engine routes
//! declarations by property *name* and re-emits values verbatim into style
//! attributes, so the parser's job is to find rule boundaries, split
//! selectors, and capture each declaration's raw value text. Unparseable
//! rules and declarations are dropped, not reported; malformed CSS is the
//! author's problem, per the upstream contract.

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser, StyleSheetParser,
};

use crate::debug::DebugLogger;

/// One `property: value` pair. `value` never carries `!important`; the flag
/// is split off at parse time and re-attached by [`Declaration::to_inline`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

impl Declaration {
    /// Render as a style-attribute fragment, `;`-terminated.
    pub fn to_inline(&self) -> String {
        if self.important {
            format!("{}: {} !important;", self.property, self.value)
        } else {
            format!("{}: {};", self.property, self.value)
        }
    }
}

/// One style rule: its selectors, its declarations in source order, and its
/// source text (`"selectors { block }"` with both interiors verbatim) kept
/// for pseudo-rule emission.
#[derive(Debug, Clone)]
pub struct Rule {
    pub selectors: Vec<String>,
    pub declarations: Vec<Declaration>,
    pub text: String,
}

/// An ordered rule list. Order is application order; there is no
/// specificity model anywhere downstream.
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    pub fn parse(css: &str) -> Self {
        Self::parse_with_debug(css, None)
    }

    pub fn parse_with_debug(css: &str, debug: Option<&DebugLogger>) -> Self {
        let mut input = ParserInput::new(css);
        let mut parser = Parser::new(&mut input);
        let mut rules = Vec::new();

        let mut rule_parser = RuleParser { rules: &mut rules };
        for result in StyleSheetParser::new(&mut parser, &mut rule_parser) {
            if result.is_err() {
                if let Some(logger) = debug {
                    logger.count("css.rules_invalid", 1);
                }
            }
        }

        if let Some(logger) = debug {
            logger.count("css.rules", rules.len() as u64);
        }
        Stylesheet { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Split a trailing `!important` off a raw declaration value.
pub(crate) fn strip_important(value: &str) -> (&str, bool) {
    let trimmed = value.trim_end();
    let len = trimmed.len();
    if len >= 9 && trimmed.is_char_boundary(len - 9) {
        let (head, tail) = trimmed.split_at(len - 9);
        if tail.eq_ignore_ascii_case("important") {
            if let Some(rest) = head.trim_end().strip_suffix('!') {
                return (rest.trim_end(), true);
            }
        }
    }
    (trimmed, false)
}

struct RuleParser<'a> {
    rules: &'a mut Vec<Rule>,
}

impl<'i> QualifiedRuleParser<'i> for RuleParser<'_> {
    type Prelude = String;
    type QualifiedRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        // The selector list is kept as raw text; kuchiki compiles it later.
        let start = input.position();
        while input.next().is_ok() {}
        Ok(input.slice_from(start).trim().to_string())
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        let start = input.position();
        let mut declarations = Vec::new();
        let mut property_parser = PropertyParser;
        for result in RuleBodyParser::new(input, &mut property_parser) {
            if let Ok(declaration) = result {
                declarations.push(declaration);
            }
        }
        let block = input.slice_from(start).trim().to_string();

        let selectors: Vec<String> = prelude
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if selectors.is_empty() {
            return Ok(());
        }
        let text = format!("{} {{ {} }}", prelude, block);
        self.rules.push(Rule {
            selectors,
            declarations,
            text,
        });
        Ok(())
    }
}

// At-rules (@media, @import, ...) are skipped wholesale; rejecting the
// prelude makes the stylesheet parser recover past the rule body.
impl<'i> AtRuleParser<'i> for RuleParser<'_> {
    type Prelude = ();
    type AtRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        _name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }
}

struct PropertyParser;

impl<'i> DeclarationParser<'i> for PropertyParser {
    type Declaration = Declaration;
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        _start: &ParserState,
    ) -> Result<Declaration, ParseError<'i, Self::Error>> {
        let start = input.position();
        while input.next().is_ok() {}
        let (value, important) = strip_important(input.slice_from(start));
        Ok(Declaration {
            property: name.to_string().to_ascii_lowercase(),
            value: value.trim().to_string(),
            important,
        })
    }
}

impl<'i> AtRuleParser<'i> for PropertyParser {
    type Prelude = ();
    type AtRule = Declaration;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        _name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }
}

impl<'i> QualifiedRuleParser<'i> for PropertyParser {
    type Prelude = ();
    type QualifiedRule = Declaration;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }
}

impl<'i> RuleBodyItemParser<'i, Declaration, ()> for PropertyParser {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_rule() {
        let sheet = Stylesheet::parse("span { color: red; }");
        assert_eq!(sheet.rules.len(), 1);
        let rule = &sheet.rules[0];
        assert_eq!(rule.selectors, vec!["span"]);
        assert_eq!(rule.declarations.len(), 1);
        assert_eq!(rule.declarations[0].property, "color");
        assert_eq!(rule.declarations[0].value, "red");
        assert!(!rule.declarations[0].important);
    }

    #[test]
    fn rule_order_preserved() {
        let sheet = Stylesheet::parse("div { background-color: red; } .alC { text-align: center }");
        assert_eq!(sheet.rules.len(), 2);
        assert_eq!(sheet.rules[0].selectors, vec!["div"]);
        assert_eq!(sheet.rules[1].selectors, vec![".alC"]);
    }

    #[test]
    fn selector_list_split() {
        let sheet = Stylesheet::parse("h1, h2 , h3 { color: red; }");
        assert_eq!(sheet.rules[0].selectors, vec!["h1", "h2", "h3"]);
    }

    #[test]
    fn important_split_from_value() {
        let sheet = Stylesheet::parse("p { color: red !IMPORTANT ; }");
        let decl = &sheet.rules[0].declarations[0];
        assert_eq!(decl.value, "red");
        assert!(decl.important);
        assert_eq!(decl.to_inline(), "color: red !important;");
    }

    #[test]
    fn text_normalizes_outer_whitespace_only() {
        let sheet = Stylesheet::parse("a:link      { color: red; }");
        assert_eq!(sheet.rules[0].text, "a:link { color: red; }");
    }

    #[test]
    fn block_without_trailing_semicolon() {
        let sheet = Stylesheet::parse(".alC { text-align: center }");
        let decl = &sheet.rules[0].declarations[0];
        assert_eq!(decl.property, "text-align");
        assert_eq!(decl.value, "center");
    }

    #[test]
    fn at_rules_skipped() {
        let sheet = Stylesheet::parse("@media screen { p { color: red; } } span { color: blue; }");
        assert_eq!(sheet.rules.len(), 1);
        assert_eq!(sheet.rules[0].selectors, vec!["span"]);
    }

    #[test]
    fn malformed_declaration_dropped() {
        let sheet = Stylesheet::parse("p { color red; font-size: 12px; }");
        let rule = &sheet.rules[0];
        assert_eq!(rule.declarations.len(), 1);
        assert_eq!(rule.declarations[0].property, "font-size");
    }

    #[test]
    fn strip_important_variants() {
        assert_eq!(strip_important("red"), ("red", false));
        assert_eq!(strip_important("red !important"), ("red", true));
        assert_eq!(strip_important("red ! important "), ("red", true));
        assert_eq!(strip_important("important"), ("important", false));
    }
}
