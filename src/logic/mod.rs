pub mod advice;
pub mod calculations;
pub mod climate;
pub mod evaluator;
pub mod mapper;
pub mod repository;
pub mod resolver;

pub use advice::AdviceEngine;
pub use calculations::LsiMethod;
pub use evaluator::SuitabilityEvaluator;
pub use mapper::ParameterMapper;
pub use repository::RuleRepository;
pub use resolver::ParameterRatingResolver;
