#![no_main]

use ferry::ast::CompilationUnit;
use ferry::passes::{OutlinePass, OutlineStyle};
use ferry::{CollectingHandler, ScanConfig, Scanner};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only well-formed units are interesting; the engine itself must never leave the stack unbalanced
    if let Ok(unit) = serde_json::from_slice::<CompilationUnit>(data) {
        let config = ScanConfig::default().with_dump_stack_on_error(false);
        let mut scanner = Scanner::new(config).with_handler(CollectingHandler::new());
        let mut pass = OutlinePass::new(OutlineStyle::Compact);
        let _ = scanner.run(&mut pass, &unit);
        assert_eq!(scanner.depth(), 0);
    }
});
