/// Reorders relevance-sorted items to counter mid-context attention loss.
///
/// Items are dealt in relevance order alternately to the front and the back of the output,
/// starting with the front, so an input ranked `[1, 2, 3, 4, 5]` comes out as
/// `[5, 3, 1, 2, 4]`. Inputs of two or fewer items are returned unchanged.
pub fn reorder_for_context<T>(items: Vec<T>) -> Vec<T> {
	if items.len() <= 2 {
		return items;
	}

	let mut front = Vec::with_capacity(items.len().div_ceil(2));
	let mut back = Vec::with_capacity(items.len() / 2);

	for (idx, item) in items.into_iter().enumerate() {
		if idx % 2 == 0 {
			front.push(item);
		} else {
			back.push(item);
		}
	}

	// Later front insertions land closer to index zero.
	front.reverse();
	front.extend(back);

	front
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn five_items_follow_front_back_dealing() {
		assert_eq!(reorder_for_context(vec![1, 2, 3, 4, 5]), vec![5, 3, 1, 2, 4]);
	}

	#[test]
	fn short_inputs_are_unchanged() {
		assert_eq!(reorder_for_context(Vec::<u32>::new()), Vec::<u32>::new());
		assert_eq!(reorder_for_context(vec![1]), vec![1]);
		assert_eq!(reorder_for_context(vec![1, 2]), vec![1, 2]);
	}

	#[test]
	fn even_length_input() {
		assert_eq!(reorder_for_context(vec![1, 2, 3, 4, 5, 6]), vec![5, 3, 1, 2, 4, 6]);
	}

	#[test]
	fn three_items() {
		assert_eq!(reorder_for_context(vec!["a", "b", "c"]), vec!["c", "a", "b"]);
	}
}
