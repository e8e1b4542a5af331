use super::Tally;
use std::cmp::Ordering;

/// Highest averages: each seat goes to the list with the largest
/// `votes / (seats + 1)`.
pub(super) fn apportion_section(mut tallies: Vec<Tally>, seats: u32) -> Vec<Tally> {
    for _ in 0..seats {
        let mut best = 0;
        for i in 1..tallies.len() {
            if outranks(&tallies[i], &tallies[best]) {
                best = i;
            }
        }
        tallies[best].seats += 1;
    }
    tallies
}

/// Compare quotients exactly by cross-multiplying; ties go to the list with
/// more votes, and an exact tie keeps the earlier list.
fn outranks(a: &Tally, b: &Tally) -> bool {
    let lhs = a.votes as u128 * (b.seats as u128 + 1);
    let rhs = b.votes as u128 * (a.seats as u128 + 1);
    match lhs.cmp(&rhs) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => a.votes > b.votes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tallies<'a>(votes: &[(&'a str, u64)]) -> Vec<Tally<'a>> {
        votes
            .iter()
            .map(|&(list, votes)| Tally {
                list,
                votes,
                seats: 0,
            })
            .collect()
    }

    fn seats(out: &[Tally]) -> Vec<u32> {
        out.iter().map(|t| t.seats).collect()
    }

    #[test]
    fn textbook_example() {
        // 100k / 80k / 30k / 20k for 8 seats → 4 / 3 / 1 / 0
        let out = apportion_section(
            tallies(&[
                ("A", 100_000),
                ("B", 80_000),
                ("C", 30_000),
                ("D", 20_000),
            ]),
            8,
        );
        assert_eq!(seats(&out), vec![4, 3, 1, 0]);
    }

    #[test]
    fn equal_quotient_goes_to_larger_list() {
        // After A takes the first seat its quotient is 60; B also has 60
        // but fewer votes, so A's 120 beats it on the tie.
        let out = apportion_section(tallies(&[("B", 60), ("A", 120)]), 2);
        assert_eq!(seats(&out), vec![0, 2]);
    }

    #[test]
    fn exact_tie_keeps_input_order() {
        let out = apportion_section(tallies(&[("A", 50), ("B", 50)]), 1);
        assert_eq!(seats(&out), vec![1, 0]);
    }
}
