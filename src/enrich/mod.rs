//! Call Enricher: the final, parallelizable pass once the class
//! hierarchy is frozen. Turns each raw `CallInfo` into its enriched
//! counterpart — resolved target, dispatch classification, confidence.

pub mod call_enricher;

pub use call_enricher::{
    enrich_calls, DispatchType, EnrichedConstructorCall, EnrichedFunctionCall, EnrichedMethodCall,
};
