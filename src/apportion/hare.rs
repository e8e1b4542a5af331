use super::{most_voted, Tally};
use std::cmp::Reverse;
use std::convert::TryFrom;

/// Largest remainder with a Hare quotient.
///
/// Remainder seats only go to lists that reached at least one full quotient.
/// When no list reaches it, the quotient is halved until one does.
pub(super) fn apportion_section(mut tallies: Vec<Tally>, seats: u32) -> Vec<Tally> {
    let total: u64 = tallies.iter().map(|t| t.votes).sum();
    let quotient = (total / seats as u64).max(1);

    let mut remainders = distribute(&mut tallies, quotient, seats);

    let mut q = quotient;
    while assigned(&tallies) == 0 {
        q = (q / 2).max(1);
        remainders = distribute(&mut tallies, q, seats);
        trim_surplus(&mut tallies, &remainders, seats);
        tracing::debug!(quotient, halved = q, "no list reached the quotient");
    }

    // The most voted list absorbs any difference, in either direction.
    let held = assigned(&tallies);
    let top = most_voted(&tallies);
    if held < seats as u64 {
        tallies[top].seats += (seats as u64 - held) as u32;
    } else if held > seats as u64 {
        let surplus = held - seats as u64;
        let taken = surplus.min(tallies[top].seats as u64);
        tallies[top].seats -= taken as u32;
        if taken < surplus {
            trim_surplus(&mut tallies, &remainders, seats);
        }
    }

    tallies
}

fn assigned(tallies: &[Tally]) -> u64 {
    tallies.iter().map(|t| t.seats as u64).sum()
}

/// Whole quotients first, then one remainder seat each for the eligible
/// lists with the largest remainders. Returns the remainders.
fn distribute(tallies: &mut [Tally], quotient: u64, seats: u32) -> Vec<u64> {
    let mut remainders = Vec::with_capacity(tallies.len());
    for tally in tallies.iter_mut() {
        tally.seats = u32::try_from(tally.votes / quotient).unwrap_or(u32::MAX);
        remainders.push(tally.votes % quotient);
    }

    let held = assigned(tallies);
    if held < seats as u64 {
        let missing = (seats as u64 - held) as usize;
        let mut eligible: Vec<usize> = (0..tallies.len())
            .filter(|&i| tallies[i].seats > 0)
            .collect();
        eligible.sort_by_key(|&i| Reverse((remainders[i], tallies[i].votes)));
        for &i in eligible.iter().take(missing) {
            tallies[i].seats += 1;
        }
    }

    remainders
}

/// Take seats back, one per list, from the holders with the smallest
/// remainders until the section is no longer over-allocated.
fn trim_surplus(tallies: &mut [Tally], remainders: &[u64], seats: u32) {
    while assigned(tallies) > seats as u64 {
        let surplus = (assigned(tallies) - seats as u64) as usize;
        let mut holders: Vec<usize> = (0..tallies.len())
            .filter(|&i| tallies[i].seats > 0)
            .collect();
        holders.sort_by_key(|&i| (remainders[i], tallies[i].votes));
        for &i in holders.iter().take(surplus) {
            tallies[i].seats -= 1;
        }
    }
}
