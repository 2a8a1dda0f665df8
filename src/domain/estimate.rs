/// Assistant-authored estimate for one ticket: the text fragments extracted
/// from the agent transcript, one per comment to post, in transcript order.
#[derive(Debug, Clone)]
pub struct Estimate {
    pub comments: Vec<String>,
}
