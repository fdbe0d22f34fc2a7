use crate::{Exchange, SlotState};

mod latest;
mod timeout;

fn count_states(exchange: &Exchange<impl Sized>, state: SlotState) -> usize {
    exchange.slot_states().into_iter().filter(|s| *s == state).count()
}
