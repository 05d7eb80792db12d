use lumen_native::demos::boxes::Boxes;

fn main()
{
  lumen_native::launch::<Boxes>();
}
