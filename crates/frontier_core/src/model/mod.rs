mod results;
mod series;
mod universe;

pub use results::{FrontierPoint, PortfolioSample, SimulationResult};
pub use series::{PriceHistory, ReturnSeries};
pub use universe::AssetUniverse;
