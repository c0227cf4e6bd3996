//! The static feed registry.
//!
//! Adding a feed means adding one [`FeedDefinition`] to [`registry`]; the
//! orchestrator and the index pick it up without further changes.

use crate::render::Channel;
use crate::source::{v2ex, zhihu, DataSource};

/// One generated feed: channel metadata plus the source that fills it.
pub struct FeedDefinition {
    /// Short stable identifier used in logs.
    pub id: &'static str,
    /// File name inside the output directory.
    pub output_name: &'static str,
    pub title: &'static str,
    pub link: &'static str,
    pub description: &'static str,
    pub source: Box<dyn DataSource>,
}

impl FeedDefinition {
    pub fn channel(&self) -> Channel<'_> {
        Channel {
            title: self.title,
            link: self.link,
            description: self.description,
        }
    }
}

/// Every feed produced by a run, in index order.
pub fn registry() -> Vec<FeedDefinition> {
    vec![
        FeedDefinition {
            id: zhihu::ID,
            output_name: "zhihu-hot.xml",
            title: "知乎热榜",
            link: "https://www.zhihu.com/hot",
            description: "Trending questions on Zhihu",
            source: Box::new(zhihu::source()),
        },
        FeedDefinition {
            id: v2ex::ID,
            output_name: "v2ex-hot.xml",
            title: "V2EX 热议主题",
            link: "https://www.v2ex.com/?tab=hot",
            description: "Hot topics on V2EX",
            source: Box::new(v2ex::source()),
        },
    ]
}
