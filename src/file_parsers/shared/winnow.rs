use std::fmt::Display;

use winnow::{
    Parser,
    combinator::{repeat, trace},
    error::ParserError,
    stream::Stream,
};

/// winnow::combinator::repeat but exact sized
pub fn repeat_array<const N: usize, I, O, E>(
    parser: impl Parser<I, O, E>,
) -> impl Parser<I, [O; N], E>
where
    I: Stream,
    E: ParserError<I>,
{
    repeat(N, parser)
        .map(|x: Vec<_>| {
            x.try_into()
                .unwrap_or_else(|_| unreachable!("Parser should take care of length"))
        })
        .trace("repeat_array")
}

/// tail .trace()
pub trait TraceHelper<I, O, E> {
    fn trace(self, name: impl Display) -> impl Parser<I, O, E>;
}

impl<P, I, O, E> TraceHelper<I, O, E> for P
where
    I: Stream,
    E: ParserError<I>,
    P: Parser<I, O, E>,
{
    fn trace(self, name: impl Display) -> impl Parser<I, O, E> {
        trace(name, self)
    }
}
